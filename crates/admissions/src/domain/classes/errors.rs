//! Class catalog errors.

use thiserror::Error;

use crate::roster::{StoreError, executor::RosterError};

/// Catalog service error variants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("class not found")]
    ClassNotFound,

    #[error("pricing tier not found")]
    TierNotFound,

    #[error("discount code not found")]
    DiscountNotFound,

    /// Another code in the class already has the same canonical form.
    #[error("discount code already exists for this class")]
    DuplicateCode,

    #[error("class capacity must be greater than zero")]
    InvalidCapacity,

    #[error("discount percentage must be between 0 and 100")]
    InvalidPercentage,

    #[error("discount code cannot be empty")]
    EmptyCode,

    /// Codes are limited to printable ASCII without spaces.
    #[error("discount code contains unsupported characters")]
    InvalidCode,

    #[error("class title cannot be empty")]
    EmptyTitle,

    #[error("record already exists")]
    AlreadyExists,

    #[error("class was modified concurrently; try again")]
    ConcurrencyConflict,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict => Self::ConcurrencyConflict,
            StoreError::AlreadyExists => Self::AlreadyExists,
            other => Self::Store(other),
        }
    }
}

impl RosterError for CatalogError {
    fn class_not_found() -> Self {
        Self::ClassNotFound
    }
}
