//! Error types for the merge engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in engine operations.
///
/// Store faults are fatal to the current invocation but never corrupt state
/// beyond what was already durably written: idempotent re-entry, not
/// rollback, is the recovery mechanism.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Store failure — propagated, the merge is not locally recovered.
    #[error("store error: {0}")]
    Store(#[from] stitch_store::StoreError),

    /// Filesystem error while reading persona fixtures.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed persona fixture or record payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
