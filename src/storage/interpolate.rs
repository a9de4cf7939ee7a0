//! Interpolator
//!
//! Fills missing buckets between consecutive records with linearly
//! interpolated values.

use crate::storage::series::Series;
use crate::storage::types::Record;

impl Series {
    /// Fill every gap between consecutive records, returning the number of
    /// synthetic records added
    ///
    /// Expects a resampled series. Both endpoints of each pair are rounded to
    /// the granularity grid; a pair that is `n` periods apart gets `n - 1`
    /// evenly spaced points between the two values. Synthetic records are
    /// merged in with a single sort after the pass and are not marked in any
    /// way. Running it again on a filled series adds nothing.
    pub fn interpolate(&mut self) -> usize {
        let granularity = self.granularity();
        let width = granularity.as_millis();

        let mut missing = Vec::new();
        for pair in self.records().windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let prev_at = granularity.round(prev.timestamp);
            let curr_at = granularity.round(curr.timestamp);

            let periods = (curr_at - prev_at) / width;
            if periods == 0 {
                continue;
            }

            let step = (curr.value - prev.value) / periods as f64;
            for period in (1..periods).rev() {
                missing.push(Record::new(
                    curr_at - (periods - period) * width,
                    prev.value + step * period as f64,
                ));
            }
        }

        let added = missing.len();
        if added > 0 {
            tracing::debug!("Interpolated {} missing records at {}", added, granularity);
        }
        self.extend_sorted(missing);
        added
    }
}
