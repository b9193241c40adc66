//! Error types for the storage layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found for a targeted update or removal.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The refresh barrier did not complete in time. Safe to retry:
    /// a merge that observed this error has not been confirmed.
    #[error("refresh barrier timed out")]
    RefreshTimeout,

    /// Backend failure (connection, index, shard).
    #[error("backend error: {0}")]
    Backend(String),
}
