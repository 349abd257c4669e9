//! Log store: the journal as one versionless table.
//!
//! Every mutation is read-entire / mutate / write-entire. Mutations work on a
//! copy of the caller's collection and only hand the copy back once the
//! table write is confirmed, so a failed call leaves the caller's view as it
//! was. The store never merges with, or re-reads, the table while writing:
//! a concurrent writer between our read and our write is overwritten (last
//! writer wins).

use crate::errors::{AppError, AppResult};
use crate::models::collection::LogCollection;
use crate::models::entry::LogEntry;
use crate::table::{RawRow, RemoteTable, Table};
use crate::utils::clock::Clock;
use crate::utils::date::{iso_week_key, parse_timestamp, parse_week_cell};
use chrono::FixedOffset;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct LogStore {
    table: Box<dyn RemoteTable>,
    source: String,
    max_staleness: Duration,
    tz: FixedOffset,
    clock: Box<dyn Clock>,
}

/// Reject content that is empty once trimmed. Returns the trimmed text.
pub fn validate_content(content: &str) -> AppResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "log content must not be empty or whitespace".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Turn a stored row into an entry. Week cells are never trusted: they are
/// recomputed from the timestamp. The flag reports whether the stored week
/// cells were missing or disagreed with the recomputation.
pub fn normalize_row(row: &RawRow, tz: &FixedOffset) -> (LogEntry, bool) {
    let Some(at) = parse_timestamp(&row.timestamp, tz) else {
        return (LogEntry::undated(row.timestamp.clone(), row.content.clone()), false);
    };

    let entry = LogEntry::new(at, row.content.clone());
    let key = iso_week_key(&at);

    let stored_year = row.iso_year.as_deref().and_then(parse_week_cell);
    let stored_week = row
        .iso_week
        .as_deref()
        .or(row.week_number.as_deref())
        .and_then(parse_week_cell);

    let consistent = stored_year == Some(i64::from(key.year))
        && stored_week == Some(i64::from(key.week))
        && row.timestamp == entry.raw_timestamp;

    (entry, !consistent)
}

/// Collection → canonical row schema.
pub fn to_table(collection: &LogCollection) -> Table {
    let rows = collection
        .iter()
        .map(|e| {
            let mut row = RawRow::new(e.raw_timestamp.clone(), e.content.clone());
            if let Some(key) = e.week {
                row.week_number = Some(key.week.to_string());
                row.iso_year = Some(key.year.to_string());
                row.iso_week = Some(key.week.to_string());
            }
            row
        })
        .collect();
    Table::from_rows(rows)
}

/// Canonical row schema → collection, in stored order.
pub fn from_table(table: &Table, tz: &FixedOffset) -> LogCollection {
    let mut repaired = 0usize;
    let entries: Vec<LogEntry> = table
        .rows
        .iter()
        .map(|row| {
            let (entry, fixed) = normalize_row(row, tz);
            if fixed {
                repaired += 1;
                debug!(timestamp = %row.timestamp, "stored week fields recomputed");
            }
            entry
        })
        .collect();

    let collection = LogCollection::from_entries(entries);
    let undated = collection.undated_count();
    if repaired > 0 || undated > 0 {
        info!(repaired, undated, "normalized log rows");
    }
    collection
}

impl LogStore {
    pub fn new(
        table: Box<dyn RemoteTable>,
        source: impl Into<String>,
        tz: FixedOffset,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            table,
            source: source.into(),
            max_staleness: Duration::ZERO,
            tz,
            clock,
        }
    }

    /// Accept cached table reads up to this age.
    pub fn with_max_staleness(mut self, max_staleness: Duration) -> Self {
        self.max_staleness = max_staleness;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tz(&self) -> FixedOffset {
        self.tz
    }

    pub fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }

    /// Read and normalize the whole table, accepting a cached copy up to
    /// the configured staleness. For display only.
    ///
    /// Any read failure, rate limits included, is `TransientFetch`: the
    /// caller must not mistake it for an empty journal.
    pub fn fetch_all(&self) -> AppResult<LogCollection> {
        self.fetch(self.max_staleness)
    }

    /// Same as `fetch_all`, but always from the backend. Every mutation is
    /// based on this read.
    pub fn fetch_fresh(&self) -> AppResult<LogCollection> {
        self.fetch(Duration::ZERO)
    }

    fn fetch(&self, max_staleness: Duration) -> AppResult<LogCollection> {
        let table = self
            .table
            .read(&self.source, max_staleness)
            .map_err(|e| {
                warn!(source = %self.source, error = %e, "log fetch failed");
                AppError::TransientFetch(e.to_string())
            })?;

        Ok(from_table(&table, &self.tz))
    }

    /// Append a new entry stamped with the current reference-zone time.
    pub fn append(&self, content: &str, collection: &LogCollection) -> AppResult<LogCollection> {
        let content = validate_content(content)?;

        let mut next = collection.clone();
        let entry = LogEntry::new(self.clock.now(), content);
        let week = entry.week;
        next.push(entry);

        self.flush(&next)?;
        info!(operation = "add", len = next.len(), week = ?week, "entry appended");
        Ok(next)
    }

    /// Replace the content of the entry at `position`. The timestamp is kept.
    pub fn edit_at(
        &self,
        position: usize,
        new_content: &str,
        collection: &LogCollection,
    ) -> AppResult<LogCollection> {
        collection.check_position(position)?;
        let content = validate_content(new_content)?;

        let mut next = collection.clone();
        next.set_content(position, content)?;

        self.flush(&next)?;
        info!(operation = "edit", position, "entry edited");
        Ok(next)
    }

    /// Remove the entry at `position`. Returns the new collection and the
    /// removed entry.
    pub fn delete_at(
        &self,
        position: usize,
        collection: &LogCollection,
    ) -> AppResult<(LogCollection, LogEntry)> {
        collection.check_position(position)?;

        let mut next = collection.clone();
        let removed = next.remove(position)?;

        self.flush(&next)?;
        info!(operation = "del", position, len = next.len(), "entry deleted");
        Ok((next, removed))
    }

    /// Overwrite the table with the complete collection.
    fn flush(&self, collection: &LogCollection) -> AppResult<()> {
        self.table
            .write(&self.source, &to_table(collection))
            .map_err(|e| {
                warn!(source = %self.source, error = %e, "log write failed");
                AppError::WriteFailure(e.to_string())
            })
    }
}
