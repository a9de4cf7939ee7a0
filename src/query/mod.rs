//! Trailing-average queries
//!
//! - **Average**: mean of one lookback window of a finalised series
//! - **Report**: carry-forward of the latest reading, then the resample →
//!   interpolate → fan-out pipeline
//!
//! # Example
//!
//! ```rust,ignore
//! use perceived_load::query::load_averages;
//!
//! let report = load_averages(series, now, &[1, 5, 15]).await?;
//! println!("{}", report);
//! ```

mod average;
mod error;
mod report;

pub use average::{average, averages, window_start, WindowAverage};
pub use error::{QueryError, QueryResult};
pub use report::{carry_forward, load_averages, LoadReport, DEFAULT_LOOKBACKS};
