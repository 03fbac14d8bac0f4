//! Admission errors.

use thiserror::Error;

use crate::{
    domain::{discounts::DiscountError, pricing::PricingError},
    roster::{StoreError, executor::RosterError},
};

/// Reasons an admission, removal or waitlist operation did not happen.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("class not found")]
    ClassNotFound,

    #[error("pricing tier not found")]
    TierNotFound,

    #[error("pricing tier is no longer offered")]
    TierInactive,

    #[error("enrollment not found")]
    EnrollmentNotFound,

    #[error("waitlist entry not found")]
    WaitlistEntryNotFound,

    #[error("student is already enrolled in this class")]
    AlreadyEnrolled,

    #[error("student is already on the waitlist for this class")]
    AlreadyWaitlisted,

    #[error("class is full")]
    ClassFull,

    /// Promotion was requested for an entry behind an earlier one.
    #[error("waitlist entry is not first in line")]
    NotFirstInLine,

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Concurrent updates to the class kept conflicting; the caller may retry.
    #[error("class was modified concurrently; try again")]
    ConcurrencyConflict,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl AdmissionError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict)
    }
}

impl From<StoreError> for AdmissionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict => Self::ConcurrencyConflict,
            other => Self::Store(other),
        }
    }
}

impl RosterError for AdmissionError {
    fn class_not_found() -> Self {
        Self::ClassNotFound
    }
}
