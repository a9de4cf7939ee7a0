//! Series storage engine
//!
//! This module provides the time-indexed series core:
//!
//! - **types**: `Record`, `Granularity`, timestamp parse/format helpers
//! - **series**: the ordered store, exact lookup, range views, CSV persistence
//! - **resample**: bucketing onto a fixed granularity
//! - **interpolate**: linear gap filling between buckets
//! - **error**: error types
//!
//! # Pipeline
//!
//! ```text
//! CSV → Series (sorted) → resample (daily buckets) → interpolate (gap-filled)
//! ```
//!
//! # Example
//!
//! ```rust
//! use perceived_load::storage::{Granularity, Series};
//!
//! let csv = "2018-01-01T10:00:00Z,10\n2018-01-05T10:00:00Z,14\n";
//! let mut series = Series::new();
//! series.read_from(csv.as_bytes()).unwrap();
//!
//! series.resample(Granularity::DAY);
//! series.interpolate();
//!
//! assert_eq!(series.len(), 5);
//! ```

pub mod error;
pub mod interpolate;
pub mod resample;
pub mod series;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use series::{Series, SeriesView};
pub use types::{
    check_timestamp, format_timestamp, parse_timestamp, try_format_timestamp, Granularity, Record,
    MILLIS_PER_DAY, MILLIS_PER_HOUR,
};
