//! Purchase error types.

use parcela_shared::types::PurchaseId;
use parcela_shared::{AppError, ErrorKind};
use thiserror::Error;

use crate::store::StoreError;

/// Errors from purchase operations.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// Description is required.
    #[error("Purchase description is required")]
    MissingDescription,

    /// Person is required.
    #[error("Purchase person is required")]
    MissingPerson,

    /// Total must be positive.
    #[error("Purchase total must be greater than zero")]
    NonPositiveTotal,

    /// At least one installment is required.
    #[error("Purchase must have at least one installment")]
    NoInstallments,

    /// Purchase not found.
    #[error("Purchase not found: {0}")]
    NotFound(PurchaseId),

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PurchaseError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDescription
            | Self::MissingPerson
            | Self::NonPositiveTotal
            | Self::NoInstallments => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::MissingPerson => "MISSING_PERSON",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::NoInstallments => "NO_INSTALLMENTS",
            Self::NotFound(_) => "PURCHASE_NOT_FOUND",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
