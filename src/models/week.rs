use crate::errors::{AppError, AppResult};
use crate::models::entry::LogEntry;
use chrono::{NaiveDate, Weekday};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// ISO-8601 week identifier. Ordering is lexicographic on (year, week),
/// so sorting keys sorts weeks chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Parse `2025-W01`, `2025-w1`, `2025W01` or `2025-1`.
    /// Rejects weeks that do not exist in that ISO year (e.g. `2025-W53`).
    pub fn parse(s: &str) -> AppResult<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re =
            RE.get_or_init(|| Regex::new(r"^(\d{4})-?[Ww]?(\d{1,2})$").expect("static regex"));

        let caps = re
            .captures(s.trim())
            .ok_or_else(|| AppError::InvalidWeek(s.to_string()))?;

        let year: i32 = caps[1]
            .parse()
            .map_err(|_| AppError::InvalidWeek(s.to_string()))?;
        let week: u32 = caps[2]
            .parse()
            .map_err(|_| AppError::InvalidWeek(s.to_string()))?;

        let key = WeekKey::new(year, week);
        if key.monday().is_none() {
            return Err(AppError::InvalidWeek(s.to_string()));
        }
        Ok(key)
    }

    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    pub fn sunday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Sun)
    }

    /// `2024-12-30 → 2025-01-05`
    pub fn span_label(&self) -> String {
        match (self.monday(), self.sunday()) {
            (Some(mon), Some(sun)) => format!("{} → {}", mon, sun),
            _ => String::from("?"),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// An entry together with its storage position in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positioned<'a> {
    pub position: usize,
    pub entry: &'a LogEntry,
}

/// Entries of one ISO week, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGroup<'a> {
    pub key: WeekKey,
    pub entries: Vec<Positioned<'a>>,
}

impl<'a> WeekGroup<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contents(&self) -> Vec<&'a str> {
        self.entries.iter().map(|p| p.entry.content.as_str()).collect()
    }
}
