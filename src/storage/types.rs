//! Core data types for the series store
//!
//! - `Record`: a single timestamped reading
//! - `Granularity`: the bucket width used by resampling and gap detection
//! - timestamp parsing and formatting for the persisted CSV form

use crate::storage::error::{StorageError, StorageResult};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Milliseconds in one hour
pub const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Date-only form accepted on read
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Unix timestamp in milliseconds (UTC)
    pub timestamp: i64,
    /// The reading
    pub value: f64,
}

impl Record {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Fixed bucket width, in milliseconds
///
/// The grid is anchored at the Unix epoch, so a one-day granularity puts
/// every bucket boundary on UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Granularity(i64);

impl Granularity {
    pub const HOUR: Granularity = Granularity(MILLIS_PER_HOUR);
    pub const DAY: Granularity = Granularity(MILLIS_PER_DAY);

    /// Create a granularity, rejecting zero and negative widths
    pub fn from_millis(millis: i64) -> StorageResult<Self> {
        if millis <= 0 {
            return Err(StorageError::InvalidGranularity(millis));
        }
        Ok(Self(millis))
    }

    /// Create a granularity from a chrono duration
    pub fn from_duration(duration: chrono::Duration) -> StorageResult<Self> {
        Self::from_millis(duration.num_milliseconds())
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Floor a timestamp to the start of its bucket
    ///
    /// Saturates at `i64::MIN` when the bucket start is not representable.
    pub fn truncate(&self, timestamp: i64) -> i64 {
        timestamp.saturating_sub(timestamp.rem_euclid(self.0))
    }

    /// Round a timestamp to the nearest bucket boundary, halfway rounds up
    ///
    /// Saturates at the `i64` bounds.
    pub fn round(&self, timestamp: i64) -> i64 {
        let rem = timestamp.rem_euclid(self.0);
        if rem < self.0 - rem {
            timestamp.saturating_sub(rem)
        } else {
            timestamp.saturating_add(self.0 - rem)
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::DAY
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % MILLIS_PER_DAY == 0 {
            write!(f, "{}d", self.0 / MILLIS_PER_DAY)
        } else if self.0 % MILLIS_PER_HOUR == 0 {
            write!(f, "{}h", self.0 / MILLIS_PER_HOUR)
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

/// Accept only timestamps that have an RFC3339 form
pub fn check_timestamp(timestamp: i64) -> StorageResult<i64> {
    match DateTime::from_timestamp_millis(timestamp) {
        Some(_) => Ok(timestamp),
        None => Err(StorageError::TimestampOutOfRange(timestamp)),
    }
}

/// Parse a persisted timestamp: RFC3339 first, then YYYY-MM-DD at UTC midnight
pub fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

/// RFC3339 UTC form, with fractional seconds only when present
pub fn try_format_timestamp(timestamp: i64) -> StorageResult<String> {
    let dt = DateTime::from_timestamp_millis(timestamp)
        .ok_or(StorageError::TimestampOutOfRange(timestamp))?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Display form of a timestamp; falls back to raw milliseconds when out of
/// range. Never persisted.
pub fn format_timestamp(timestamp: i64) -> String {
    try_format_timestamp(timestamp).unwrap_or_else(|_| format!("{}ms", timestamp))
}
