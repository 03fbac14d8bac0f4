//! Roster Changes

use crate::domain::{
    admissions::records::{EnrollmentRecord, EnrollmentUuid},
    classes::records::{ClassStatus, PricingTierRecord, PricingTierUuid},
    discounts::records::{DiscountCodeRecord, DiscountCodeUuid},
    waitlist::records::{WaitlistEntryRecord, WaitlistEntryUuid},
};

/// A single write against a locked class roster.
///
/// Counter changes carry absolute values computed from the locked roster, so
/// applying a change never needs another read.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterChange {
    InsertEnrollment(EnrollmentRecord),
    DeleteEnrollment(EnrollmentUuid),
    InsertWaitlistEntry(WaitlistEntryRecord),
    DeleteWaitlistEntry(WaitlistEntryUuid),
    SetEnrolledCount(u64),
    SetClassStatus(ClassStatus),
    InsertPricingTier(PricingTierRecord),
    UpdatePricingTier {
        tier: PricingTierUuid,
        is_default: bool,
        is_active: bool,
    },
    SetTierEnrollmentCount {
        tier: PricingTierUuid,
        enrollment_count: u64,
    },
    InsertDiscountCode(DiscountCodeRecord),
    SetDiscountActive {
        discount: DiscountCodeUuid,
        is_active: bool,
    },
    SetDiscountUsageCount {
        discount: DiscountCodeUuid,
        usage_count: u64,
    },
}

impl RosterChange {
    /// Short name used in logs and spans.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsertEnrollment(_) => "insert_enrollment",
            Self::DeleteEnrollment(_) => "delete_enrollment",
            Self::InsertWaitlistEntry(_) => "insert_waitlist_entry",
            Self::DeleteWaitlistEntry(_) => "delete_waitlist_entry",
            Self::SetEnrolledCount(_) => "set_enrolled_count",
            Self::SetClassStatus(_) => "set_class_status",
            Self::InsertPricingTier(_) => "insert_pricing_tier",
            Self::UpdatePricingTier { .. } => "update_pricing_tier",
            Self::SetTierEnrollmentCount { .. } => "set_tier_enrollment_count",
            Self::InsertDiscountCode(_) => "insert_discount_code",
            Self::SetDiscountActive { .. } => "set_discount_active",
            Self::SetDiscountUsageCount { .. } => "set_discount_usage_count",
        }
    }
}
