//! # Perceived Load
//!
//! Log a single "perceived load" reading per day and report trailing
//! averages over configurable lookback windows, tolerating days with no
//! reading.
//!
//! ## Modules
//!
//! - [`storage`]: the time-indexed series engine (ordered store, range
//!   views, resampling, gap filling, CSV persistence)
//! - [`query`]: trailing averages and the report pipeline
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perceived_load::storage::Series;
//! use perceived_load::query::load_averages;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut series = Series::open("perceived-load.csv")?;
//!
//!     // Log today's reading and persist it
//!     let now = chrono::Utc::now().timestamp_millis();
//!     series.insert(now, 1.2)?;
//!     series.write("perceived-load.csv")?;
//!
//!     // Resample, fill gaps and average
//!     let report = load_averages(series, now, &[1, 5, 15]).await?;
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;
pub mod query;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{Granularity, Record, Series, SeriesView, StorageError, StorageResult};

pub use query::{
    average, averages, load_averages, LoadReport, QueryError, QueryResult, WindowAverage,
};

pub use config::{Config, ConfigError, DatabaseConfig, LoggingConfig, ReportConfig};
