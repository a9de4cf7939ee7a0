//! Query error types
//!
//! Defines the error conditions of trailing-average computation.

use thiserror::Error;

/// Errors that can occur while averaging a series
#[derive(Error, Debug)]
pub enum QueryError {
    /// No records fall inside the lookback window
    #[error("No readings in the last {lookback_days} days (since {start})")]
    EmptyRange { lookback_days: u32, start: String },

    /// Lookback windows are counted in whole days, starting at one
    #[error("Invalid lookback: {0} days")]
    InvalidLookback(u32),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    /// A fan-out task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for QueryError {
    fn from(err: tokio::task::JoinError) -> Self {
        QueryError::Task(err.to_string())
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
