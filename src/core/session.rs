//! One interaction session: the log store, the working set it last read,
//! and the summary cache. Created at session start, dropped at the end.

use crate::core::store::{LogStore, validate_content};
use crate::core::summary::{SummaryCache, SummarySource};
use crate::core::weeks::current_week_key;
use crate::errors::{AppError, AppResult};
use crate::models::collection::LogCollection;
use crate::models::entry::LogEntry;
use crate::models::week::WeekKey;
use crate::summary::SummaryProducer;
use tracing::{debug, warn};

/// What the session knows about the journal.
///
/// `Unknown` is distinct from an empty `Loaded`: after a failed read the
/// journal may well hold entries, and nothing may be written on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingSet {
    Unknown(String),
    Loaded(LogCollection),
}

pub struct Session {
    store: LogStore,
    working: WorkingSet,
    summary: SummaryCache,
}

impl Session {
    /// Start a session without touching the table.
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            working: WorkingSet::Unknown("not loaded yet".into()),
            summary: SummaryCache::new(),
        }
    }

    /// Start a session and load the journal. A failed load is kept as an
    /// `Unknown` working set; the session is still usable for a retry.
    pub fn open(store: LogStore) -> Self {
        let mut session = Self::new(store);
        if let Err(e) = session.refresh() {
            warn!(error = %e, "initial load failed");
        }
        session
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working
    }

    pub fn summary_cache(&self) -> &SummaryCache {
        &self.summary
    }

    pub fn current_week(&self) -> WeekKey {
        current_week_key(&self.store.now())
    }

    /// The loaded journal, or `TransientFetch` if the last read failed.
    pub fn collection(&self) -> AppResult<&LogCollection> {
        match &self.working {
            WorkingSet::Loaded(c) => Ok(c),
            WorkingSet::Unknown(reason) => Err(AppError::TransientFetch(reason.clone())),
        }
    }

    /// Re-read the whole table (cached reads allowed). The summary cache is
    /// dropped when the journal changed underneath us.
    pub fn refresh(&mut self) -> AppResult<&LogCollection> {
        let read = self.store.fetch_all();
        self.adopt(read)
    }

    /// Re-read bypassing any read cache; the base of every mutation.
    fn refresh_fresh(&mut self) -> AppResult<&LogCollection> {
        let read = self.store.fetch_fresh();
        self.adopt(read)
    }

    fn adopt(&mut self, read: AppResult<LogCollection>) -> AppResult<&LogCollection> {
        match read {
            Ok(fresh) => {
                if let WorkingSet::Loaded(held) = &self.working
                    && *held != fresh
                {
                    debug!("journal changed since last read");
                    self.summary.invalidate();
                }
                self.working = WorkingSet::Loaded(fresh);
                self.collection()
            }
            Err(e) => {
                self.working = WorkingSet::Unknown(e.to_string());
                Err(e)
            }
        }
    }

    fn commit(&mut self, next: LogCollection) {
        self.working = WorkingSet::Loaded(next);
        self.summary.invalidate();
    }

    /// Append on top of a fresh read. Empty content fails before the table
    /// is touched.
    pub fn append(&mut self, content: &str) -> AppResult<&LogCollection> {
        validate_content(content)?;

        let base = self.refresh_fresh()?.clone();
        let next = self.store.append(content, &base)?;
        self.commit(next);
        self.collection()
    }

    /// Edit the entry the caller sees at `position` in the held collection.
    pub fn edit_at(&mut self, position: usize, new_content: &str) -> AppResult<&LogCollection> {
        validate_content(new_content)?;

        let (fresh, at) = self.resolve(position)?;
        let next = self.store.edit_at(at, new_content, &fresh)?;
        self.commit(next);
        self.collection()
    }

    /// Delete the entry the caller sees at `position`; returns it.
    pub fn delete_at(&mut self, position: usize) -> AppResult<LogEntry> {
        let (fresh, at) = self.resolve(position)?;
        let (next, removed) = self.store.delete_at(at, &fresh)?;
        self.commit(next);
        Ok(removed)
    }

    /// Map a position in the held view onto a fresh read of the table.
    ///
    /// Out of range: the view is stale, so reload before failing. Entry gone
    /// from the fresh read (someone else deleted or edited it): `NotFound`.
    fn resolve(&mut self, position: usize) -> AppResult<(LogCollection, usize)> {
        let held = self.collection()?;
        let Some(target) = held.get(position).cloned() else {
            let err = AppError::Index {
                position,
                len: held.len(),
            };
            if let Err(e) = self.refresh_fresh() {
                warn!(error = %e, "reload after stale position failed");
            }
            return Err(err);
        };

        let fresh = self.refresh_fresh()?.clone();
        let at = fresh.locate(&target, position).ok_or_else(|| {
            AppError::NotFound(format!(
                "entry #{} ({}) changed in the shared table, reload and retry",
                position + 1,
                target.raw_timestamp
            ))
        })?;
        if at != position {
            debug!(from = position, to = at, "entry moved since last read");
        }
        Ok((fresh, at))
    }

    /// Summary for `scope` (default: current week), through the cache.
    pub fn summary(
        &mut self,
        scope: Option<WeekKey>,
        producer: &dyn SummaryProducer,
        on_chunk: &mut dyn FnMut(&str),
    ) -> AppResult<(String, SummarySource)> {
        let scope = scope.unwrap_or_else(|| self.current_week());
        let collection = match &self.working {
            WorkingSet::Loaded(c) => c,
            WorkingSet::Unknown(reason) => return Err(AppError::TransientFetch(reason.clone())),
        };
        Ok(self
            .summary
            .get_or_produce_for(collection, scope, producer, on_chunk))
    }
}
