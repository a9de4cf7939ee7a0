//! Resampler
//!
//! Rebuckets a series onto a fixed granularity, one averaged record per
//! bucket.

use crate::storage::series::Series;
use crate::storage::types::{Granularity, Record};
use std::collections::HashMap;

impl Series {
    /// Replace every group of records sharing a bucket with their mean
    ///
    /// Each record's timestamp is truncated to the start of its
    /// `granularity` interval. The result holds exactly one record per
    /// distinct bucket, keyed by the bucket start, sorted ascending. The
    /// series adopts `granularity` for later gap detection.
    pub fn resample(&mut self, granularity: Granularity) {
        // Group values by truncated timestamp
        let mut buckets: HashMap<i64, (f64, usize)> = HashMap::new();
        for record in self.records() {
            let bucket = granularity.truncate(record.timestamp);
            let entry = buckets.entry(bucket).or_insert((0.0, 0));
            entry.0 += record.value;
            entry.1 += 1;
        }

        // Every bucket has at least one contributing record
        let records: Vec<Record> = buckets
            .into_iter()
            .map(|(timestamp, (total, count))| Record::new(timestamp, total / count as f64))
            .collect();

        if records.is_empty() {
            tracing::warn!("Resampling an empty series");
        } else {
            tracing::debug!(
                "Resampled {} records into {} buckets of {}",
                self.len(),
                records.len(),
                granularity
            );
        }

        self.replace(granularity, records);
    }
}
