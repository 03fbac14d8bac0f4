//! Pricing
//!
//! Amount due for an admission, in whole cents.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::domain::discounts::records::DiscountValue;

/// Errors raised while computing an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Percentage discount outside `0..=100`.
    #[error("discount percentage {0} is outside 0..=100")]
    PercentageOutOfRange(Decimal),

    /// The discounted amount could not be represented in cents.
    #[error("discounted amount could not be represented in cents")]
    Conversion,
}

/// Compute the amount due for a tier price and an optional discount.
///
/// Without a tier there is nothing to charge, so the amount is zero whatever
/// the discount. Percentage discounts round the discounted amount to the
/// nearest cent, halves rounding up. Fixed discounts never go below zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentageOutOfRange`] for a percentage outside
/// `0..=100`, or [`PricingError::Conversion`] if the result cannot be
/// represented.
pub fn compute_amount(
    tier_price: Option<u64>,
    discount: Option<&DiscountValue>,
) -> Result<u64, PricingError> {
    let Some(price) = tier_price else {
        return Ok(0);
    };

    match discount {
        None => Ok(price),
        Some(DiscountValue::AmountOff { amount }) => Ok(price.saturating_sub(*amount)),
        Some(DiscountValue::PercentageOff { percentage }) => percentage_off(price, *percentage),
    }
}

fn percentage_off(price: u64, percentage: Decimal) -> Result<u64, PricingError> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(PricingError::PercentageOutOfRange(percentage));
    }

    let remaining = Decimal::ONE_HUNDRED - percentage;

    let discounted = Decimal::from(price)
        .checked_mul(remaining)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Conversion)?;

    discounted
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Conversion)
}
