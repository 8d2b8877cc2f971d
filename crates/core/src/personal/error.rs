//! Personal expense error types.

use parcela_shared::types::ExpenseId;
use parcela_shared::{AppError, ErrorKind};
use thiserror::Error;

use crate::store::StoreError;

/// Errors from personal expense operations.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Description is required.
    #[error("Expense description is required")]
    MissingDescription,

    /// Total must be positive.
    #[error("Expense total must be greater than zero")]
    NonPositiveTotal,

    /// Split expenses need a counterparty.
    #[error("Split expense needs a counterparty")]
    MissingCounterparty,

    /// My share must lie within `[0, total]`.
    #[error("My share must be between zero and the total")]
    ShareOutOfRange,

    /// Due day outside `1..=31`.
    #[error("Invalid due day: {0}")]
    InvalidDueDay(u32),

    /// An installment would fall outside the supported calendar.
    #[error("Installment date out of range")]
    DateOutOfRange,

    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    /// Only credit expenses can be marked paid by hand.
    #[error("Expense {0} is not a credit expense")]
    NotCredit(ExpenseId),

    /// Only fixed expenses can be (de)activated.
    #[error("Expense {0} is not a fixed expense")]
    NotFixed(ExpenseId),

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ExpenseError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDescription
            | Self::NonPositiveTotal
            | Self::MissingCounterparty
            | Self::ShareOutOfRange
            | Self::InvalidDueDay(_)
            | Self::DateOutOfRange
            | Self::NotCredit(_)
            | Self::NotFixed(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::MissingCounterparty => "MISSING_COUNTERPARTY",
            Self::ShareOutOfRange => "SHARE_OUT_OF_RANGE",
            Self::InvalidDueDay(_) => "INVALID_DUE_DAY",
            Self::DateOutOfRange => "DATE_OUT_OF_RANGE",
            Self::NotFound(_) => "EXPENSE_NOT_FOUND",
            Self::NotCredit(_) => "NOT_CREDIT_EXPENSE",
            Self::NotFixed(_) => "NOT_FIXED_EXPENSE",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
