//! Domain error types for the audit pipeline.

use thiserror::Error;

/// Errors raised while building or persisting an audit record.
///
/// These are always caught at the observer or recorder boundary; no variant
/// ever reaches the business operation that triggered the audit.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entity snapshot is not an object: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the structured audit store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(String),
}
