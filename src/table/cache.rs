use super::{RemoteTable, Table, TableError};
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tracing::debug;

struct Cached {
    source: String,
    stored_at: Instant,
    table: Table,
}

/// Read-through cache for read-rate protection.
///
/// A read is answered from memory when the last copy for the same source is
/// younger than the caller's `max_staleness`. Successful writes replace the
/// cached copy, so a session always reads back its own last write; failed
/// writes drop it.
pub struct ReadCache<T> {
    inner: T,
    slot: RefCell<Option<Cached>>,
}

impl<T: RemoteTable> ReadCache<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            slot: RefCell::new(None),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn remember(&self, source: &str, table: &Table) {
        *self.slot.borrow_mut() = Some(Cached {
            source: source.to_string(),
            stored_at: Instant::now(),
            table: table.clone(),
        });
    }
}

impl<T: RemoteTable> RemoteTable for ReadCache<T> {
    fn read(&self, source: &str, max_staleness: Duration) -> Result<Table, TableError> {
        if !max_staleness.is_zero()
            && let Some(c) = self.slot.borrow().as_ref()
            && c.source == source
            && c.stored_at.elapsed() <= max_staleness
        {
            debug!(source, age_ms = c.stored_at.elapsed().as_millis() as u64, "table cache hit");
            return Ok(c.table.clone());
        }

        let table = self.inner.read(source, max_staleness)?;
        self.remember(source, &table);
        Ok(table)
    }

    fn write(&self, source: &str, table: &Table) -> Result<(), TableError> {
        match self.inner.write(source, table) {
            Ok(()) => {
                self.remember(source, table);
                Ok(())
            }
            Err(e) => {
                self.slot.borrow_mut().take();
                Err(e)
            }
        }
    }
}
