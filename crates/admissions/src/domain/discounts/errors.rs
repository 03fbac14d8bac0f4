//! Discount code errors.

use thiserror::Error;

/// Reasons a discount code cannot be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiscountError {
    #[error("discount code not found for this class")]
    NotFound,

    #[error("discount code is inactive")]
    Inactive,

    #[error("discount code has expired")]
    Expired,

    #[error("discount code usage limit reached")]
    LimitReached,
}
