#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use rweeklog::core::store::LogStore;
use rweeklog::table::{MemoryTable, RawRow, ReadCache};
use rweeklog::utils::clock::FixedClock;
use rweeklog::utils::date::parse_timezone;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const SOURCE: &str = "journal";

/// CLI under test, with its configuration directory moved out of `$HOME`.
pub fn rwl() -> Command {
    let mut cmd = cargo_bin_cmd!("rweeklog");
    let mut dir: PathBuf = env::temp_dir();
    dir.push("rweeklog_test_config");
    cmd.env("RWEEKLOG_CONFIG_DIR", dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Create a unique table path inside the system temp dir and remove any existing file
pub fn setup_test_table(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rweeklog.csv", name));
    let table_path = path.to_string_lossy().to_string();
    fs::remove_file(&table_path).ok();
    table_path
}

/// Add one entry through the CLI with a frozen clock.
pub fn add_at(table: &str, now: &str, text: &str) {
    rwl()
        .args(["--table", table, "--now", now, "add", text])
        .assert()
        .success();
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("test timestamp")
}

/// Log store over an in-memory table; the returned handle shares its state.
pub fn memory_store(rows: Vec<RawRow>, now: &str) -> (LogStore, MemoryTable) {
    let mem = MemoryTable::with_rows(SOURCE, rows);
    let tz = parse_timezone("+08:00").expect("tz");
    let store = LogStore::new(Box::new(mem.clone()), SOURCE, tz, Box::new(FixedClock(at(now))));
    (store, mem)
}

/// Like `memory_store`, behind a read cache accepting copies up to `staleness` old.
pub fn cached_store(rows: Vec<RawRow>, now: &str, staleness: Duration) -> (LogStore, MemoryTable) {
    let mem = MemoryTable::with_rows(SOURCE, rows);
    let tz = parse_timezone("+08:00").expect("tz");
    let store = LogStore::new(
        Box::new(ReadCache::new(mem.clone())),
        SOURCE,
        tz,
        Box::new(FixedClock(at(now))),
    )
    .with_max_staleness(staleness);
    (store, mem)
}

pub fn row(ts: &str, content: &str) -> RawRow {
    RawRow::new(ts, content)
}
