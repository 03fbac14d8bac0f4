//! Admission Data

use crate::domain::{
    admissions::records::{EnrollmentUuid, StudentUuid},
    classes::records::{ClassUuid, PricingTierUuid},
};

/// New Enrollment Data
///
/// The enrollment UUID is chosen by the caller so that a retried request
/// cannot create a second enrollment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub uuid: EnrollmentUuid,
    pub class_uuid: ClassUuid,
    pub student_uuid: StudentUuid,
    pub pricing_tier_uuid: Option<PricingTierUuid>,

    /// Discount code as entered by the student.
    pub discount_code: Option<String>,

    pub emergency_contact: Option<String>,
}

/// Seat selection for a waitlist promotion.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    /// UUID for the enrollment the promotion creates.
    pub enrollment_uuid: EnrollmentUuid,
    pub pricing_tier_uuid: Option<PricingTierUuid>,
    pub discount_code: Option<String>,
}
