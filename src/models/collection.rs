use crate::errors::{AppError, AppResult};
use crate::models::entry::LogEntry;

/// Ordered journal, storage order = append order.
///
/// Positions are the only identity rows have, so nothing in here ever
/// reorders `entries`. Sorted views are built on the side (see `core::weeks`).
/// Mutators are crate-private: only the log store changes a collection,
/// and it always writes the result back in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogCollection {
    entries: Vec<LogEntry>,
}

impl LogCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&LogEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn undated_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_time_valid()).count()
    }

    /// Bounds check against the currently held view.
    pub fn check_position(&self, position: usize) -> AppResult<()> {
        if position < self.entries.len() {
            Ok(())
        } else {
            Err(AppError::Index {
                position,
                len: self.entries.len(),
            })
        }
    }

    /// Find `target` in this collection. The hinted position wins when it
    /// still holds the same entry; otherwise the first identical entry.
    pub fn locate(&self, target: &LogEntry, hint: usize) -> Option<usize> {
        if self
            .entries
            .get(hint)
            .is_some_and(|e| e.same_identity(target))
        {
            return Some(hint);
        }
        self.entries.iter().position(|e| e.same_identity(target))
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn set_content(&mut self, position: usize, content: String) -> AppResult<()> {
        self.check_position(position)?;
        self.entries[position].content = content;
        Ok(())
    }

    pub(crate) fn remove(&mut self, position: usize) -> AppResult<LogEntry> {
        self.check_position(position)?;
        Ok(self.entries.remove(position))
    }
}

impl<'a> IntoIterator for &'a LogCollection {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
