//! Clock abstraction: "now" as civil time in the reference timezone.

use chrono::{FixedOffset, NaiveDateTime, Utc};

pub trait Clock {
    /// Current civil time in the reference timezone.
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock, converted from UTC into the configured offset.
pub struct SystemClock {
    pub tz: FixedOffset,
}

impl SystemClock {
    pub fn new(tz: FixedOffset) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// Frozen clock, used by `--now` and by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
