//! Load report
//!
//! Runs the full pipeline over raw readings and renders the result:
//!
//! ```text
//! resample (daily) → interpolate → freeze (Arc) → fan-out averages → join
//! ```
//!
//! Each stage completes before the next starts, so no averaging task can
//! observe a partially resampled or interpolated series.

use crate::query::average::{averages, WindowAverage};
use crate::query::error::QueryResult;
use crate::storage::{format_timestamp, Granularity, Series};
use serde::Serialize;
use std::sync::Arc;

/// Lookback windows reported when none are configured
pub const DEFAULT_LOOKBACKS: [u32; 3] = [1, 5, 15];

/// Trailing averages as of one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    /// Start of the reporting day (RFC3339)
    pub as_of: String,
    pub windows: Vec<WindowAverage>,
}

impl LoadReport {
    fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
        items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
    }

    /// Comma separated window lengths, e.g. `1, 5, 15`
    pub fn days(&self) -> String {
        Self::join(self.windows.iter().map(|w| w.lookback_days))
    }

    /// Comma separated averages to one decimal, e.g. `1.0, 1.2, 0.9`
    pub fn loads(&self) -> String {
        Self::join(self.windows.iter().map(|w| format!("{:.1}", w.average)))
    }
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Perceived task load average ({} days): {}",
            self.days(),
            self.loads()
        )?;
        write!(f, "Optimum is 1.0; higher values mean delayed tasks")
    }
}

/// Repeat the latest reading at `now` so the report reaches today
///
/// Returns false, leaving the series untouched, when there is nothing to
/// carry. The extra record is never persisted.
pub fn carry_forward(series: &mut Series, now: i64) -> QueryResult<bool> {
    let Some(last) = series.last().copied() else {
        return Ok(false);
    };
    series.insert(now, last.value)?;
    tracing::debug!(
        "Carried {} forward from {} to {}",
        last.value,
        format_timestamp(last.timestamp),
        format_timestamp(now)
    );
    Ok(true)
}

/// Resample to days, fill gaps, then average every lookback window
pub async fn load_averages(
    mut series: Series,
    as_of: i64,
    lookbacks: &[u32],
) -> QueryResult<LoadReport> {
    series.resample(Granularity::DAY);
    series.interpolate();
    tracing::debug!("Series finalised with {} daily records", series.len());

    let today = Granularity::DAY.truncate(as_of);
    let windows = averages(Arc::new(series), today, lookbacks).await?;

    Ok(LoadReport {
        as_of: format_timestamp(today),
        windows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;
    use crate::storage::StorageError;
    use chrono::{TimeZone, Utc};

    fn millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp_millis()
    }

    #[tokio::test]
    async fn test_load_averages_over_sparse_readings() {
        // Jan 10 averages to 1.0, Jan 11..13 are missing, Jan 14 is 3.0
        let csv = "\
2018-01-10T08:00:00Z,0.5
2018-01-10T20:00:00Z,1.5
2018-01-14T09:00:00Z,3
";
        let mut series = Series::new();
        series.read_from(csv.as_bytes()).unwrap();

        let report = load_averages(series, millis(2018, 1, 14, 18), &[1, 3, 5])
            .await
            .unwrap();

        assert_eq!(report.as_of, "2018-01-14T00:00:00Z");
        // Filled: 1.0, 1.5, 2.0, 2.5, 3.0
        let averages: Vec<f64> = report.windows.iter().map(|w| w.average).collect();
        assert_eq!(averages, vec![3.0, 2.5, 2.0]);
    }

    #[tokio::test]
    async fn test_load_averages_empty_series() {
        let err = load_averages(Series::new(), millis(2018, 1, 14, 0), &DEFAULT_LOOKBACKS)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::EmptyRange { lookback_days: 1, .. }));
    }

    #[tokio::test]
    async fn test_carry_forward_reaches_today() {
        let csv = "\
2018-01-10T08:00:00Z,1
2018-01-12T08:00:00Z,3
";
        let mut series = Series::new();
        series.read_from(csv.as_bytes()).unwrap();
        let now = millis(2018, 1, 15, 9);

        // Without the carried reading today's window is empty
        let err = load_averages(series.clone(), now, &[1]).await.unwrap_err();
        assert!(matches!(err, QueryError::EmptyRange { lookback_days: 1, .. }));

        assert!(carry_forward(&mut series, now).unwrap());
        assert_eq!(series.len(), 3);
        assert_eq!(series.lookup(now).unwrap(), 3.0);

        let report = load_averages(series, now, &[1, 5]).await.unwrap();
        assert_eq!(report.as_of, "2018-01-15T00:00:00Z");
        // Filled: 1, 2, 3, 3, 3, 3
        let averages: Vec<f64> = report.windows.iter().map(|w| w.average).collect();
        assert_eq!(averages, vec![3.0, 2.8]);
    }

    #[test]
    fn test_carry_forward_empty_series() {
        let mut series = Series::new();
        assert!(!carry_forward(&mut series, millis(2018, 1, 15, 9)).unwrap());
        assert!(series.is_empty());
    }

    #[test]
    fn test_carry_forward_out_of_range_is_storage_error() {
        let mut series = Series::new();
        series.insert(millis(2018, 1, 10, 8), 1.0).unwrap();

        let err = carry_forward(&mut series, i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Storage(StorageError::TimestampOutOfRange(i64::MAX))
        ));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_report_display() {
        let report = LoadReport {
            as_of: "2018-01-15T00:00:00Z".to_string(),
            windows: vec![
                WindowAverage { lookback_days: 1, average: 1.0 },
                WindowAverage { lookback_days: 5, average: 1.24 },
                WindowAverage { lookback_days: 15, average: 0.94 },
            ],
        };

        assert_eq!(
            report.to_string(),
            "Perceived task load average (1, 5, 15 days): 1.0, 1.2, 0.9\n\
             Optimum is 1.0; higher values mean delayed tasks"
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = LoadReport {
            as_of: "2018-01-15T00:00:00Z".to_string(),
            windows: vec![WindowAverage { lookback_days: 1, average: 1.5 }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["windows"][0]["lookback_days"], 1);
        assert_eq!(json["windows"][0]["average"], 1.5);
    }
}
