//! Observation error types.

use parcela_shared::{AppError, ErrorKind};
use thiserror::Error;

use crate::store::StoreError;

/// Errors from observation operations.
#[derive(Debug, Error)]
pub enum ObservationError {
    /// Person is required.
    #[error("Person is required")]
    MissingPerson,

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ObservationError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingPerson => ErrorKind::Validation,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPerson => "MISSING_PERSON",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }
}

impl From<ObservationError> for AppError {
    fn from(err: ObservationError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
