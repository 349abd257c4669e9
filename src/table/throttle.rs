use super::{RemoteTable, Table, TableError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::warn;

/// Client-side request quota: at most `max_requests` backend calls per
/// sliding `window`. Over quota, calls fail fast with `RateLimited` instead
/// of hitting the backend. `max_requests == 0` disables the limit.
pub struct Throttled<T> {
    inner: T,
    max_requests: usize,
    window: Duration,
    stamps: RefCell<VecDeque<Instant>>,
}

impl<T: RemoteTable> Throttled<T> {
    pub fn new(inner: T, max_requests: u32, window: Duration) -> Self {
        Self {
            inner,
            max_requests: max_requests as usize,
            window,
            stamps: RefCell::new(VecDeque::new()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn admit(&self) -> Result<(), TableError> {
        if self.max_requests == 0 {
            return Ok(());
        }

        let mut stamps = self.stamps.borrow_mut();
        let now = Instant::now();
        while stamps
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            stamps.pop_front();
        }

        if stamps.len() >= self.max_requests {
            let oldest = stamps.front().copied().unwrap_or(now);
            let wait = self.window.saturating_sub(now.duration_since(oldest));
            let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            warn!(
                max = self.max_requests,
                retry_after_secs, "table request quota exhausted"
            );
            return Err(TableError::RateLimited { retry_after_secs });
        }

        stamps.push_back(now);
        Ok(())
    }
}

impl<T: RemoteTable> RemoteTable for Throttled<T> {
    fn read(&self, source: &str, max_staleness: Duration) -> Result<Table, TableError> {
        self.admit()?;
        self.inner.read(source, max_staleness)
    }

    fn write(&self, source: &str, table: &Table) -> Result<(), TableError> {
        self.admit()?;
        self.inner.write(source, table)
    }
}
