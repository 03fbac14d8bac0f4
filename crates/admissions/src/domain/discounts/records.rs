//! Discount Code Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{domain::classes::records::ClassUuid, uuids::TypedUuid};

/// Discount Code UUID
pub type DiscountCodeUuid = TypedUuid<DiscountCodeRecord>;

/// How a discount code reduces a tier price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountValue {
    /// Percentage off, between 0 and 100 inclusive.
    PercentageOff { percentage: Decimal },

    /// Fixed amount off, in cents.
    AmountOff { amount: u64 },
}

impl DiscountValue {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "percentage",
            Self::AmountOff { .. } => "fixed",
        }
    }
}

/// Discount Code Record
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCodeRecord {
    pub uuid: DiscountCodeUuid,
    pub class_uuid: ClassUuid,

    /// Canonical (trimmed, uppercase) code, unique within the class.
    pub code: String,

    pub value: DiscountValue,
    pub expires_at: Option<Timestamp>,

    /// Maximum redemptions; `0` means unlimited.
    pub usage_limit: u64,

    pub usage_count: u64,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl DiscountCodeRecord {
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.usage_limit > 0 && self.usage_count >= self.usage_limit
    }

    #[must_use]
    pub fn is_expired_at(&self, at: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < at)
    }
}
