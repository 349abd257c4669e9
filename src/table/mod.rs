//! Remote table access.
//!
//! The backing store is a single shared sheet-like table with two primitives:
//! read everything, overwrite everything. There is no partial update, no
//! versioning and no compare-and-swap; the last writer wins.

mod cache;
mod csv_file;
mod memory;
mod throttle;

pub use cache::ReadCache;
pub use csv_file::CsvFileTable;
pub use memory::MemoryTable;
pub use throttle::Throttled;

use crate::config::Config;
use std::time::Duration;
use thiserror::Error;

/// Canonical column set, in write order.
pub const COLUMNS: [&str; 5] = ["timestamp", "content", "week_number", "iso_year", "iso_week"];

/// One stored row, cells kept as text. Week cells are informational only:
/// readers recompute them from `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub timestamp: String,
    pub content: String,
    pub week_number: Option<String>,
    pub iso_year: Option<String>,
    pub iso_week: Option<String>,
}

impl RawRow {
    pub fn new(timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub(crate) fn cells(&self) -> [&str; 5] {
        [
            &self.timestamp,
            &self.content,
            self.week_number.as_deref().unwrap_or(""),
            self.iso_year.as_deref().unwrap_or(""),
            self.iso_week.as_deref().unwrap_or(""),
        ]
    }
}

/// Full table contents. An empty table still has the canonical columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<RawRow>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited by the table backend, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("malformed table: {0}")]
    Malformed(String),
}

/// Read/write primitive of the shared table.
pub trait RemoteTable {
    /// Read the whole table. A cached copy no older than `max_staleness` may
    /// be served; `Duration::ZERO` asks for a fresh read.
    fn read(&self, source: &str, max_staleness: Duration) -> Result<Table, TableError>;

    /// Replace every row of the table with `table`.
    fn write(&self, source: &str, table: &Table) -> Result<(), TableError>;
}

impl<T: RemoteTable + ?Sized> RemoteTable for Box<T> {
    fn read(&self, source: &str, max_staleness: Duration) -> Result<Table, TableError> {
        (**self).read(source, max_staleness)
    }

    fn write(&self, source: &str, table: &Table) -> Result<(), TableError> {
        (**self).write(source, table)
    }
}

/// Adapter stack used by the CLI: read cache over request throttle over the
/// CSV file.
pub fn open(cfg: &Config) -> Box<dyn RemoteTable> {
    let file = CsvFileTable::new();
    let throttled = Throttled::new(file, cfg.max_requests_per_minute, Duration::from_secs(60));
    Box::new(ReadCache::new(throttled))
}
