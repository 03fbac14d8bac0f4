//! Class Data

use crate::domain::classes::records::{ClassStatus, ClassUuid, PricingTierUuid};

/// New Class Offering Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewClassOffering {
    pub uuid: ClassUuid,
    pub title: String,
    pub capacity: u64,
    pub status: ClassStatus,
}

/// New Pricing Tier Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPricingTier {
    pub uuid: PricingTierUuid,
    pub name: String,

    /// Price in cents.
    pub price: u64,

    /// Makes this the class's default tier, demoting any existing default.
    pub is_default: bool,
}
