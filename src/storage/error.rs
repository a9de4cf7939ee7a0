//! Storage layer error types
//!
//! Defines all errors that can occur while building, querying or persisting
//! a series.

use thiserror::Error;

/// Errors that can occur in the series store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader or writer failed below the record level
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A persisted line did not have exactly two fields
    #[error("line {line}: expected 2 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    /// A persisted timestamp was neither RFC3339 nor YYYY-MM-DD
    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    /// A persisted value was not a decimal float
    #[error("line {line}: invalid value {value:?}")]
    InvalidValue { line: u64, value: String },

    /// Exact-timestamp lookup found no record
    #[error("invalid timestamp {timestamp}")]
    TimestampNotFound { timestamp: String },

    /// Timestamp has no calendar form, so it cannot be stored
    #[error("timestamp out of range: {0}ms")]
    TimestampOutOfRange(i64),

    /// Granularity must be a positive number of milliseconds
    #[error("Invalid granularity: {0}ms")]
    InvalidGranularity(i64),
}

impl StorageError {
    /// True for the recoverable lookup-miss condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::TimestampNotFound { .. })
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
