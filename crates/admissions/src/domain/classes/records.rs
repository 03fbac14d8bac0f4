//! Class Records

use jiff::Timestamp;

use crate::{domain::studios::records::StudioUuid, uuids::TypedUuid};

/// Class Offering UUID
pub type ClassUuid = TypedUuid<ClassOfferingRecord>;

/// Scheduling state of a class offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassStatus {
    Draft,
    Published,
    InSession,
    Completed,
    Cancelled,
}

impl ClassStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::InSession => "in_session",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "in_session" => Some(Self::InSession),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Class Offering Record
#[derive(Debug, Clone, PartialEq)]
pub struct ClassOfferingRecord {
    pub uuid: ClassUuid,
    pub studio_uuid: StudioUuid,
    pub title: String,

    /// Seat ceiling, fixed when the class is created.
    pub capacity: u64,

    /// Number of active enrollments; never exceeds `capacity`.
    pub enrolled_count: u64,

    pub status: ClassStatus,
    pub created_at: Timestamp,
}

impl ClassOfferingRecord {
    /// Seats still available for admission.
    #[must_use]
    pub const fn seats_remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.enrolled_count)
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.enrolled_count >= self.capacity
    }
}

/// Pricing Tier UUID
pub type PricingTierUuid = TypedUuid<PricingTierRecord>;

/// Pricing Tier Record
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTierRecord {
    pub uuid: PricingTierUuid,
    pub class_uuid: ClassUuid,
    pub name: String,

    /// Price in cents.
    pub price: u64,

    pub is_default: bool,
    pub is_active: bool,
    pub enrollment_count: u64,
    pub created_at: Timestamp,
}
