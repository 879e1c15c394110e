//! Failures reported by a data store.

use thiserror::Error;

/// Classified failure returned by every store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The identifier does not reference an existing entity.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The payload or identifier is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request is well formed but clashes with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage or infrastructure fault.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
