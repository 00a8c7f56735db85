//! Error types for the invoice core

use thiserror::Error;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying storage engine failed to open, read, or write
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A bulk operation completed for some records and failed for others
    #[error("Partial failure: {succeeded} succeeded, {} failed ({failed:?})", failed.len())]
    PartialFailure {
        /// Number of records the operation completed for
        succeeded: usize,
        /// Ids the operation did not complete for
        failed: Vec<i64>,
    },

    /// Operation required a record that does not exist
    #[error("Record not found: {0}")]
    NotFound(i64),

    /// Caller passed a record violating required-field invariants
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidInput(err.to_string())
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
