//! Roster store errors.

use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

/// SQLSTATE codes for transient conflicts that are safe to retry.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    AlreadyExists,

    #[error("related record not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    /// A concurrent transaction won; the whole unit may be retried.
    #[error("conflicting concurrent update")]
    Conflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl StoreError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        if matches!(
            database_error.code().as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        ) {
            return Self::Conflict;
        }

        match database_error.kind() {
            ErrorKind::UniqueViolation => Self::AlreadyExists,
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => Self::InvalidData,
            ErrorKind::Other | _ => Self::Sql(error),
        }
    }
}
