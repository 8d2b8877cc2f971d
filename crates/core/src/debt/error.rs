//! Debt ledger error types.

use parcela_shared::types::{DebtId, PaymentId};
use parcela_shared::{AppError, ErrorKind};
use thiserror::Error;

use crate::store::StoreError;

/// Errors from debt ledger operations.
#[derive(Debug, Error)]
pub enum DebtError {
    /// Amount must be positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Person is required.
    #[error("Debt person is required")]
    MissingPerson,

    /// Description is required.
    #[error("Debt description is required")]
    MissingDescription,

    /// Nothing left to pay.
    #[error("Debt {0} is already settled")]
    AlreadySettled(DebtId),

    /// Debt not found.
    #[error("Debt not found: {0}")]
    DebtNotFound(DebtId),

    /// Payment not found in the debt's history.
    #[error("Payment {payment_id} not found on debt {debt_id}")]
    PaymentNotFound {
        /// The debt searched.
        debt_id: DebtId,
        /// The missing payment.
        payment_id: PaymentId,
    },

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DebtError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveAmount
            | Self::MissingPerson
            | Self::MissingDescription
            | Self::AlreadySettled(_) => ErrorKind::Validation,
            Self::DebtNotFound(_) | Self::PaymentNotFound { .. } => ErrorKind::NotFound,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::MissingPerson => "MISSING_PERSON",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::AlreadySettled(_) => "DEBT_ALREADY_SETTLED",
            Self::DebtNotFound(_) => "DEBT_NOT_FOUND",
            Self::PaymentNotFound { .. } => "PAYMENT_NOT_FOUND",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }
}

impl From<DebtError> for AppError {
    fn from(err: DebtError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
