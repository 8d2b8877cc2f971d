//! Partial payment error types.

use parcela_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Errors from partial payment operations.
#[derive(Debug, Error)]
pub enum PartialPaymentError {
    /// Amount must be positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// More than what is left for the month.
    #[error("Payment of {amount} exceeds the remaining {remaining}")]
    ExceedsRemaining {
        /// Amount offered.
        amount: Decimal,
        /// Amount still owed for the month.
        remaining: Decimal,
    },

    /// Person is required.
    #[error("Person is required")]
    MissingPerson,

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PartialPaymentError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveAmount | Self::ExceedsRemaining { .. } | Self::MissingPerson => {
                ErrorKind::Validation
            }
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
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

impl From<PartialPaymentError> for AppError {
    fn from(err: PartialPaymentError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
