//! Storage error types.

use parcela_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Storage collaborator errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not present in the collection.
    #[error("{kind} record not found: {id}")]
    NotFound {
        /// Entity kind.
        kind: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// A record with the same id already exists.
    #[error("{kind} record already exists: {id}")]
    Duplicate {
        /// Entity kind.
        kind: &'static str,
        /// Conflicting identifier.
        id: String,
    },

    /// Record or patch could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backend rejected or failed the operation.
    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } | Self::Codec(_) | Self::Backend(_) => ErrorKind::Persistence,
        }
    }

    /// Returns the error code for front-end messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "RECORD_NOT_FOUND",
            Self::Duplicate { .. } => "DUPLICATE_RECORD",
            Self::Codec(_) => "CODEC_ERROR",
            Self::Backend(_) => "STORAGE_BACKEND_ERROR",
        }
    }

    /// Returns true if retrying the same write may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
