//! Series Store
//!
//! An ordered collection of `Record`s plus the granularity later stages
//! bucket by. Records are kept sorted ascending by timestamp at all times:
//! `insert` places each record at its sorted position and every bulk load
//! sorts once before returning.
//!
//! Range queries return a `SeriesView`, a borrowed slice of the parent's
//! storage. The parent cannot be mutated while a view is alive.
//!
//! # Persisted form
//!
//! ```text
//! 2018-01-01T10:00:00Z,10
//! 2018-01-02,20
//! ```
//!
//! One record per line, no header. Date-only timestamps are read as UTC
//! midnight; writes always emit RFC3339. Timestamps without a calendar form
//! are rejected on the way in, so everything in a series can be written back.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{
    check_timestamp, format_timestamp, parse_timestamp, try_format_timestamp, Granularity, Record,
};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Index of the leftmost record whose timestamp is not before `timestamp`
fn lower_bound(records: &[Record], timestamp: i64) -> usize {
    records.partition_point(|r| r.timestamp < timestamp)
}

/// A time-indexed series of scalar readings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    granularity: Granularity,
    // must remain sorted by timestamp
    records: Vec<Record>,
}

impl Series {
    /// Create an empty series with daily granularity
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty series with a specific granularity
    pub fn with_granularity(granularity: Granularity) -> Self {
        Self {
            granularity,
            records: Vec::new(),
        }
    }

    /// Build a series from arbitrary records, sorting them once
    pub fn from_records(granularity: Granularity, records: Vec<Record>) -> StorageResult<Self> {
        for record in &records {
            check_timestamp(record.timestamp)?;
        }
        let mut series = Self {
            granularity,
            records,
        };
        series.sort();
        Ok(series)
    }

    /// Read a series from a CSV file
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let mut series = Self::new();
        series.read(path)?;
        Ok(series)
    }

    /// Like [`Series::open`], but a missing file is an empty series
    pub fn open_or_empty(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No series at {:?}, starting empty", path);
                Ok(Self::new())
            }
            result => result,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Borrow the whole series as a view
    pub fn view(&self) -> SeriesView<'_> {
        SeriesView {
            granularity: self.granularity,
            records: &self.records,
        }
    }

    /// Insert a reading at its sorted position
    ///
    /// Records sharing a timestamp keep insertion order, so appending the
    /// newest reading is amortised O(1).
    pub fn insert(&mut self, timestamp: i64, value: f64) -> StorageResult<()> {
        check_timestamp(timestamp)?;
        let index = self.records.partition_point(|r| r.timestamp <= timestamp);
        self.records.insert(index, Record::new(timestamp, value));
        Ok(())
    }

    /// Find the value recorded at exactly `timestamp`
    pub fn lookup(&self, timestamp: i64) -> StorageResult<f64> {
        self.view().lookup(timestamp)
    }

    /// View of every record at or after `timestamp`
    pub fn since(&self, timestamp: i64) -> SeriesView<'_> {
        self.view().since(timestamp)
    }

    pub(crate) fn sort(&mut self) {
        // stable, so duplicate timestamps keep their relative order
        self.records.sort_by_key(|r| r.timestamp);
    }

    /// Replace the whole record sequence and granularity
    pub(crate) fn replace(&mut self, granularity: Granularity, records: Vec<Record>) {
        self.granularity = granularity;
        self.records = records;
        self.sort();
    }

    /// Append synthetic records, then restore order once
    pub(crate) fn extend_sorted(&mut self, records: Vec<Record>) {
        if records.is_empty() {
            return;
        }
        self.records.extend(records);
        self.sort();
    }

    /// Read records from a CSV file into this series
    ///
    /// See [`Series::read_from`] for the partial-read behaviour.
    pub fn read(&mut self, path: impl AsRef<Path>) -> StorageResult<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::debug!("Reading series from {:?}", path);
        self.read_from(file)
    }

    /// Read CSV records from any reader into this series
    ///
    /// Returns the number of records added. A malformed line aborts the read
    /// and its error is returned; records parsed before that line stay in
    /// the series. The series is sorted in both cases.
    pub fn read_from<R: Read>(&mut self, reader: R) -> StorageResult<usize> {
        let before = self.records.len();
        let result = self.parse_rows(reader);
        self.sort();
        let added = self.records.len() - before;

        match result {
            Ok(()) => {
                tracing::debug!("Read {} records", added);
                Ok(added)
            }
            Err(e) => {
                tracing::warn!("Read aborted after {} records: {}", added, e);
                Err(e)
            }
        }
    }

    fn parse_rows<R: Read>(&mut self, reader: R) -> StorageResult<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            if row.len() != 2 {
                return Err(StorageError::FieldCount {
                    line,
                    found: row.len(),
                });
            }

            let timestamp =
                parse_timestamp(&row[0]).ok_or_else(|| StorageError::InvalidTimestamp {
                    line,
                    value: row[0].to_string(),
                })?;
            let value = row[1]
                .parse::<f64>()
                .map_err(|_| StorageError::InvalidValue {
                    line,
                    value: row[1].to_string(),
                })?;

            self.records.push(Record::new(timestamp, value));
        }

        Ok(())
    }

    /// Rewrite a CSV file with every record, in series order
    pub fn write(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(file)?;
        tracing::debug!("Wrote {} records to {:?}", self.records.len(), path);
        Ok(())
    }

    /// Write CSV records to any writer
    ///
    /// Every timestamp is formatted before the first byte goes out, so an
    /// unwritable record leaves the writer untouched.
    pub fn write_to<W: Write>(&self, writer: W) -> StorageResult<()> {
        let rows = self
            .records
            .iter()
            .map(|r| Ok([try_format_timestamp(r.timestamp)?, r.value.to_string()]))
            .collect::<StorageResult<Vec<_>>>()?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        for row in &rows {
            writer.write_record(row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// A borrowed range of a `Series`
///
/// Shares storage with its parent; creating one is O(1).
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    granularity: Granularity,
    records: &'a [Record],
}

impl<'a> SeriesView<'a> {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + 'a {
        self.records.iter().map(|r| r.value)
    }

    /// Arithmetic mean of the view, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        Some(self.values().sum::<f64>() / self.records.len() as f64)
    }

    /// Find the value recorded at exactly `timestamp`
    pub fn lookup(&self, timestamp: i64) -> StorageResult<f64> {
        let index = lower_bound(self.records, timestamp);
        match self.records.get(index) {
            Some(record) if record.timestamp == timestamp => Ok(record.value),
            _ => Err(StorageError::TimestampNotFound {
                timestamp: format_timestamp(timestamp),
            }),
        }
    }

    /// Narrow to every record at or after `timestamp`
    pub fn since(&self, timestamp: i64) -> SeriesView<'a> {
        let index = lower_bound(self.records, timestamp);
        SeriesView {
            granularity: self.granularity,
            records: &self.records[index..],
        }
    }
}
