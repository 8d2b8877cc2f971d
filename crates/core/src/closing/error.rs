//! Month closing error types.

use parcela_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::debt::DebtError;
use crate::partial::PartialPaymentError;

/// Errors from closing a month.
#[derive(Debug, Error)]
pub enum ClosingError {
    /// Paying a negative amount.
    #[error("Payment cannot be negative")]
    NegativePayment,

    /// Paying more than what is left for the month.
    #[error("Payment of {paying_now} exceeds the remaining {remaining}")]
    ExceedsRemaining {
        /// Amount offered now.
        paying_now: Decimal,
        /// Month total minus what was already paid.
        remaining: Decimal,
    },

    /// Recording the partial payment failed.
    #[error(transparent)]
    Tracker(#[from] PartialPaymentError),

    /// Opening the carry-over debt failed.
    #[error(transparent)]
    Ledger(#[from] DebtError),
}

impl ClosingError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativePayment | Self::ExceedsRemaining { .. } => ErrorKind::Validation,
            Self::Tracker(err) => err.kind(),
            Self::Ledger(err) => err.kind(),
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativePayment => "NEGATIVE_PAYMENT",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
            Self::Tracker(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NegativePayment | Self::ExceedsRemaining { .. } => false,
            Self::Tracker(err) => err.is_retryable(),
            Self::Ledger(err) => err.is_retryable(),
        }
    }
}

impl From<ClosingError> for AppError {
    fn from(err: ClosingError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
