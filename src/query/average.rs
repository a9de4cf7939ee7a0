//! Trailing averages
//!
//! `average` computes the mean of one lookback window; `averages` fans one
//! task out per window over a shared, read-only series and joins them
//! before returning.
//!
//! # Window convention
//!
//! `as_of` is truncated to its UTC day, whatever the series granularity, and a lookback of `n` days starts
//! `n - 1` days before that, so `n` covers the `n` most recent daily buckets
//! including today's. Everything from the window start to the end of the
//! series is averaged.

use crate::query::error::{QueryError, QueryResult};
use crate::storage::{format_timestamp, Granularity, Series, MILLIS_PER_DAY};
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// Average over one lookback window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowAverage {
    pub lookback_days: u32,
    pub average: f64,
}

/// First timestamp inside a lookback window ending on `as_of`'s day
pub fn window_start(as_of: i64, lookback_days: u32) -> QueryResult<i64> {
    if lookback_days == 0 {
        return Err(QueryError::InvalidLookback(lookback_days));
    }
    let today = Granularity::DAY.truncate(as_of);
    Ok(today.saturating_sub((lookback_days as i64 - 1) * MILLIS_PER_DAY))
}

/// Mean of every record in the lookback window
///
/// Fails with `QueryError::EmptyRange` rather than returning NaN when the
/// window holds no records.
pub fn average(series: &Series, as_of: i64, lookback_days: u32) -> QueryResult<f64> {
    let start = window_start(as_of, lookback_days)?;
    series
        .since(start)
        .mean()
        .ok_or_else(|| QueryError::EmptyRange {
            lookback_days,
            start: format_timestamp(start),
        })
}

/// Evaluate one `average` per lookback, concurrently
///
/// The series is shared behind an `Arc`, so no task can mutate it. Results
/// come back in the order of `lookbacks`; the first failing window, in that
/// order, fails the whole call.
pub async fn averages(
    series: Arc<Series>,
    as_of: i64,
    lookbacks: &[u32],
) -> QueryResult<Vec<WindowAverage>> {
    let tasks = lookbacks.iter().map(move |&lookback_days| {
        let series = Arc::clone(&series);
        tokio::spawn(async move {
            let average = average(&series, as_of, lookback_days)?;
            tracing::debug!("{}-day average: {}", lookback_days, average);
            Ok::<_, QueryError>(WindowAverage {
                lookback_days,
                average,
            })
        })
    });

    // Barrier: every slot is written before any result is used
    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| -> QueryResult<WindowAverage> { joined? })
        .collect()
}
