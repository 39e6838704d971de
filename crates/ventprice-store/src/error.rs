//! Store error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the price repository
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database file could not be opened
    #[error("cannot open price database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query failed
    #[error("query error: {0}")]
    Query(#[from] rusqlite::Error),
}
