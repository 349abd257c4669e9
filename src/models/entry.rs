use crate::models::week::WeekKey;
use crate::utils::date::{format_timestamp, iso_week_key};
use chrono::NaiveDateTime;

/// One journal line.
///
/// `timestamp` is civil time in the reference timezone. When the stored text
/// could not be parsed it is `None`, `raw_timestamp` keeps the original text
/// so the row survives the next full-table write, and `week` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub raw_timestamp: String, // ⇔ column `timestamp`
    pub timestamp: Option<NaiveDateTime>,
    pub content: String, // ⇔ column `content`
    pub week: Option<WeekKey>,
}

impl LogEntry {
    /// New entry at a known civil time. The week key is derived here and
    /// nowhere else.
    pub fn new(at: NaiveDateTime, content: impl Into<String>) -> Self {
        Self {
            raw_timestamp: format_timestamp(&at),
            timestamp: Some(at),
            content: content.into(),
            week: Some(iso_week_key(&at)),
        }
    }

    /// Entry whose stored timestamp could not be interpreted.
    pub fn undated(raw_timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            raw_timestamp: raw_timestamp.into(),
            timestamp: None,
            content: content.into(),
            week: None,
        }
    }

    pub fn is_time_valid(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Identity used to find this entry again in a fresh read.
    pub fn same_identity(&self, other: &LogEntry) -> bool {
        self.raw_timestamp == other.raw_timestamp && self.content == other.content
    }

    /// `MM-DD HH:MM`, or the raw text for undated rows.
    pub fn short_time(&self) -> String {
        match &self.timestamp {
            Some(ts) => ts.format("%m-%d %H:%M").to_string(),
            None => self.raw_timestamp.clone(),
        }
    }

    /// Day label used when handing entries to a summary producer.
    pub fn day_label(&self) -> String {
        match &self.timestamp {
            Some(ts) => ts.format("%a %m-%d").to_string(),
            None => String::from("undated"),
        }
    }
}
