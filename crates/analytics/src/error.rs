//! Report error types

use thiserror::Error;

/// Report errors
///
/// Any failure aborts the report render; there is no partial output.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filter options that cannot be translated to a query
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Unrecognized chart duration name
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Group membership lookup failed
    #[error("group lookup failed: {0}")]
    Group(String),

    /// Store error (from logreport-store)
    #[error("store error: {0}")]
    Store(#[from] logreport_store::StoreError),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
