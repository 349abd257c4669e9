use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{add_at, rwl, setup_test_table};

const NOW: &str = "2025-01-03 18:00:00";

fn stdout_of(args: &[&str]) -> String {
    let out = rwl().args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf8 stdout")
}

#[test]
fn test_init_creates_table_with_canonical_header() {
    let table = setup_test_table("init_creates");

    rwl()
        .args(["--table", &table, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Empty log table created"));

    let text = fs::read_to_string(&table).unwrap();
    assert_eq!(text.lines().next(), Some("timestamp,content,week_number,iso_year,iso_week"));

    // second init keeps the table
    add_at(&table, NOW, "first");
    rwl()
        .args(["--table", &table, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Existing log table kept (1 entries)"));
}

#[test]
fn test_add_and_list() {
    let table = setup_test_table("add_and_list");

    rwl()
        .args(["--table", &table, "--now", "2024-12-30 09:00:00", "add", "Kickoff", "planning"])
        .assert()
        .success()
        .stdout(contains("Saved #1 at 2024-12-30 09:00:00 (2025-W01)"));
    add_at(&table, "2025-01-02 14:30:00", "Fixed login bug");

    let out = stdout_of(&["--table", &table, "list"]);
    assert!(out.contains("Kickoff planning"));
    assert!(out.contains("Fixed login bug"));
    assert!(out.contains("2025-W01"));
    // newest first
    assert!(out.find("Fixed login bug").unwrap() < out.find("Kickoff planning").unwrap());

    rwl()
        .args(["--table", &table, "list", "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("Fixed login bug").and(contains("Kickoff").not()));
}

#[test]
fn test_add_rejects_blank_content() {
    let table = setup_test_table("add_blank");

    rwl()
        .args(["--table", &table, "add", "   "])
        .assert()
        .failure()
        .stderr(contains("Invalid entry"));

    // nothing was read or written
    assert!(!std::path::Path::new(&table).exists());
}

#[test]
fn test_weeks_groups_across_year_boundary() {
    let table = setup_test_table("weeks_year_boundary");
    add_at(&table, "2023-01-01 10:00:00", "sunday release");
    add_at(&table, "2025-01-02 14:00:00", "code review");
    add_at(&table, "2024-12-30 09:00:00", "kickoff");

    let out = stdout_of(&["--table", &table, "--now", NOW, "weeks"]);

    assert!(out.contains("2025-W01"));
    assert!(out.contains("2024-12-30 → 2025-01-05"));
    assert!(out.contains("(current week)"));
    assert!(out.contains("2022-W52"));
    assert!(out.find("2025-W01").unwrap() < out.find("2022-W52").unwrap());
    // ascending inside the week
    assert!(out.find("kickoff").unwrap() < out.find("code review").unwrap());

    rwl()
        .args(["--table", &table, "weeks", "--week", "2022-W52"])
        .assert()
        .success()
        .stdout(contains("sunday release").and(contains("kickoff").not()));
}

#[test]
fn test_edit_replaces_content() {
    let table = setup_test_table("edit_content");
    add_at(&table, "2025-01-02 09:00:00", "draft text");

    rwl()
        .args(["--table", &table, "edit", "1", "final", "text"])
        .assert()
        .success()
        .stdout(contains("Entry #1 updated."));

    rwl()
        .args(["--table", &table, "list"])
        .assert()
        .success()
        .stdout(contains("final text").and(contains("draft text").not()))
        .stdout(contains("2025-01-02 09:00:00"));

    rwl()
        .args(["--table", &table, "edit", "0", "x"])
        .assert()
        .failure()
        .stderr(contains("entry numbers start at 1"));
}

#[test]
fn test_delete_with_and_without_confirmation() {
    let table = setup_test_table("delete_confirm");
    add_at(&table, "2025-01-02 09:00:00", "keep me");
    add_at(&table, "2025-01-02 10:00:00", "remove me");

    rwl()
        .args(["--table", &table, "del", "2"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    rwl()
        .args(["--table", &table, "del", "2"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Entry #2 from 2025-01-02 10:00:00 has been deleted."));

    rwl()
        .args(["--table", &table, "list"])
        .assert()
        .success()
        .stdout(contains("keep me").and(contains("remove me").not()));

    rwl()
        .args(["--table", &table, "del", "1", "--yes"])
        .assert()
        .success();

    rwl()
        .args(["--table", &table, "list"])
        .assert()
        .success()
        .stdout(contains("No log entries yet"));
}

#[test]
fn test_delete_out_of_range() {
    let table = setup_test_table("delete_out_of_range");
    add_at(&table, "2025-01-02 09:00:00", "only one");

    rwl()
        .args(["--table", &table, "del", "5", "--yes"])
        .assert()
        .failure()
        .stderr(contains("No entry #5"));
}

#[test]
fn test_summary_of_current_and_other_weeks() {
    let table = setup_test_table("summary_weeks");
    add_at(&table, "2024-12-30 09:00:00", "kickoff");
    add_at(&table, "2025-01-02 14:00:00", "code review");
    add_at(&table, "2023-01-01 10:00:00", "sunday release");

    rwl()
        .args(["--table", &table, "--now", NOW, "summary"])
        .assert()
        .success()
        .stdout(contains("2025-W01: 2 entries across 2 days"))
        .stdout(contains("Mon 12-30: kickoff"))
        .stdout(contains("sunday release").not());

    rwl()
        .args(["--table", &table, "--now", NOW, "summary", "--week", "2022-W52", "--no-stream"])
        .assert()
        .success()
        .stdout(contains("2022-W52: 1 entry across 1 day"));

    rwl()
        .args(["--table", &table, "--now", "2025-03-10 09:00:00", "summary"])
        .assert()
        .success()
        .stdout(contains("No log entries this week yet."));

    rwl()
        .args(["--table", &table, "summary", "--week", "2025-W53"])
        .assert()
        .failure()
        .stderr(contains("Invalid ISO week"));
}

#[test]
fn test_legacy_table_rows_are_shown_and_preserved() {
    let table = setup_test_table("legacy_rows");
    fs::write(
        &table,
        "Timestamp,Content,Week_Number\n\
         2023-01-01 10:00:00,old entry,1.0\n\
         not a date,mystery row,\n",
    )
    .unwrap();

    rwl()
        .args(["--table", &table, "list"])
        .assert()
        .success()
        .stdout(contains("⚠ not a date"))
        .stdout(contains("2022-W52"));

    rwl()
        .args(["--table", &table, "weeks"])
        .assert()
        .success()
        .stdout(contains("Undated · 1 with an unreadable timestamp"))
        .stdout(contains("mystery row"));

    add_at(&table, NOW, "new row");

    let text = fs::read_to_string(&table).unwrap();
    assert!(text.starts_with("timestamp,content,week_number,iso_year,iso_week\n"));
    assert!(text.contains("2023-01-01 10:00:00,old entry,52,2022,52"));
    assert!(text.contains("not a date,mystery row,,,"));
}

#[test]
fn test_shell_caches_summary_until_a_change() {
    let table = setup_test_table("shell_session");

    rwl()
        .args(["--table", &table, "--now", NOW, "shell"])
        .write_stdin("add wrote the shell\nsummary\nsummary\nadd one more\nsummary\nbogus\nquit\n")
        .assert()
        .success()
        .stdout(contains("Saved #1."))
        .stdout(contains("(cached, no changes since the last summary)"))
        .stdout(contains("2025-W01: 2 entries across 1 day"))
        .stdout(contains("Unknown command 'bogus'"));
}
