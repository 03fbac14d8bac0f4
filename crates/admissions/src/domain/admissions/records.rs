//! Enrollment Records

use jiff::Timestamp;

use crate::{
    domain::{
        classes::records::{ClassUuid, PricingTierUuid},
        discounts::records::DiscountCodeUuid,
    },
    uuids::TypedUuid,
};

/// Student marker; students are owned by the identity system.
#[derive(Debug)]
pub struct Student;

/// Student UUID
pub type StudentUuid = TypedUuid<Student>;

/// Enrollment UUID
pub type EnrollmentUuid = TypedUuid<EnrollmentRecord>;

/// Enrollment lifecycle state. Admission only ever produces active enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Active,
}

impl EnrollmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Payment state recorded at admission; settlement happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// An amount is owed.
    Pending,

    /// Nothing is owed.
    NotRequired,
}

impl PaymentStatus {
    #[must_use]
    pub const fn for_amount(amount: u64) -> Self {
        if amount == 0 {
            Self::NotRequired
        } else {
            Self::Pending
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::NotRequired => "not_required",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "not_required" => Some(Self::NotRequired),
            _ => None,
        }
    }
}

/// Enrollment Record
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub uuid: EnrollmentUuid,
    pub class_uuid: ClassUuid,
    pub student_uuid: StudentUuid,
    pub pricing_tier_uuid: Option<PricingTierUuid>,
    pub discount_code_uuid: Option<DiscountCodeUuid>,

    /// Amount computed at admission, in cents.
    pub amount_paid: u64,

    pub status: EnrollmentStatus,
    pub payment_status: PaymentStatus,
    pub emergency_contact: Option<String>,
    pub enrolled_at: Timestamp,
}
