//! Store error types

use thiserror::Error;

/// Errors that can occur while querying a log store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend failed; propagated unchanged, never retried here
    #[error("storage failure: {0}")]
    Storage(String),

    /// Unknown time grain name
    #[error("unknown time grain: {0}")]
    UnknownGrain(String),

    /// I/O error from the backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
