//! Date utilities: reference timezone, permissive timestamp parsing, ISO weeks.
//!
//! Every civil time handled by the crate is expressed in one fixed reference
//! offset taken from the configuration. The process-local timezone is never
//! consulted.

use crate::errors::{AppError, AppResult};
use crate::models::week::WeekKey;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Canonical persisted timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a reference timezone: `UTC`, `Z`, `+08:00`, `-0530`, `+8`.
pub fn parse_timezone(s: &str) -> AppResult<FixedOffset> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("utc") || t.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::InvalidTimezone(s.to_string()));
    }

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(?:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("static regex")
    });

    let caps = re
        .captures(t)
        .ok_or_else(|| AppError::InvalidTimezone(s.to_string()))?;

    let hours: i32 = caps[2]
        .parse()
        .map_err(|_| AppError::InvalidTimezone(s.to_string()))?;
    let minutes: i32 = caps
        .get(3)
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);

    if hours > 14 || minutes > 59 {
        return Err(AppError::InvalidTimezone(s.to_string()));
    }

    let secs = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
    FixedOffset::east_opt(secs).ok_or_else(|| AppError::InvalidTimezone(s.to_string()))
}

/// Format a civil time in the canonical `YYYY-MM-DD HH:MM:SS` form.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp permissively into reference-timezone civil time.
///
/// Returns `None` when nothing matches; callers keep the raw text and flag
/// the entry instead of dropping it.
pub fn parse_timestamp(raw: &str, tz: &FixedOffset) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let dt_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    for fmt in dt_formats.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // An explicit offset wins over the reference zone: convert, don't relabel.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(tz).naive_local());
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    parse_serial_day(s)
}

/// Spreadsheet serial day number (days since 1899-12-30, fraction = time of day).
fn parse_serial_day(s: &str) -> Option<NaiveDateTime> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\d{5}(\.\d+)?$").expect("static regex"));
    if !re.is_match(s) {
        return None;
    }

    let serial: f64 = s.parse().ok()?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let secs = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(secs))
}

/// Parse a numeric week-ish cell (`52`, `52.0`, ` 7 `). Dataframe tooling
/// writes integer columns with missing values as floats.
pub fn parse_week_cell(raw: &str) -> Option<i64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*(-?\d+)(?:\.0+)?\s*$").expect("static regex"));
    re.captures(raw).and_then(|c| c[1].parse().ok())
}

/// ISO-8601 (year, week) of a civil time.
pub fn iso_week_key(dt: &NaiveDateTime) -> WeekKey {
    let w = dt.date().iso_week();
    WeekKey::new(w.year(), w.week())
}
