//! Discount Code Data

use jiff::Timestamp;

use crate::domain::discounts::records::{DiscountCodeUuid, DiscountValue};

/// New Discount Code Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountCode {
    pub uuid: DiscountCodeUuid,

    /// Code as typed by staff; stored trimmed and uppercased.
    pub code: String,

    pub value: DiscountValue,
    pub expires_at: Option<Timestamp>,

    /// Maximum redemptions; `0` means unlimited.
    pub usage_limit: u64,
}
