use rweeklog::core::weeks::{
    chronological, current_week_key, group_by_week, ordered_groups, undated, week_entries,
};
use rweeklog::errors::AppError;
use rweeklog::models::collection::LogCollection;
use rweeklog::models::entry::LogEntry;
use rweeklog::models::week::WeekKey;
use rweeklog::utils::date::{parse_timestamp, parse_timezone, parse_week_cell};

mod common;
use common::at;

fn journal() -> LogCollection {
    LogCollection::from_entries(vec![
        LogEntry::new(at("2025-01-02 14:00:00"), "code review"),
        LogEntry::new(at("2024-12-30 09:00:00"), "kickoff"),
        LogEntry::undated("sometime", "lost timestamp"),
        LogEntry::new(at("2023-01-01 10:00:00"), "sunday release"),
        LogEntry::new(at("2025-01-06 08:00:00"), "new week"),
    ])
}

#[test]
fn test_week_groups_straddle_the_calendar_year() {
    let c = journal();
    let map = group_by_week(&c);

    let w01 = &map[&WeekKey::new(2025, 1)];
    assert_eq!(w01.contents(), vec!["kickoff", "code review"]);
    // storage positions survive grouping
    assert_eq!(w01.entries[0].position, 1);
    assert_eq!(w01.entries[1].position, 0);

    assert_eq!(map[&WeekKey::new(2022, 52)].contents(), vec!["sunday release"]);
    assert_eq!(map.len(), 3);
}

#[test]
fn test_groups_are_most_recent_first() {
    let c = journal();
    let keys: Vec<WeekKey> = ordered_groups(group_by_week(&c))
        .into_iter()
        .map(|(k, _)| k)
        .collect();

    assert_eq!(
        keys,
        vec![
            WeekKey::new(2025, 2),
            WeekKey::new(2025, 1),
            WeekKey::new(2022, 52)
        ]
    );
    assert!(keys.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_grouping_is_idempotent_and_does_not_reorder() {
    let c = journal();
    let before = c.clone();

    assert_eq!(group_by_week(&c), group_by_week(&c));
    assert_eq!(c, before);
}

#[test]
fn test_undated_entries_are_not_in_any_week() {
    let c = journal();
    let total: usize = group_by_week(&c).values().map(|g| g.len()).sum();
    assert_eq!(total, c.len() - 1);

    let u = undated(&c);
    assert_eq!(u.len(), 1);
    assert_eq!(u[0].position, 2);
    assert_eq!(u[0].entry.content, "lost timestamp");
}

#[test]
fn test_week_entries_for_an_empty_week() {
    let c = journal();
    let g = week_entries(&c, WeekKey::new(2024, 10));
    assert!(g.is_empty());
    assert_eq!(g.key, WeekKey::new(2024, 10));

    assert_eq!(week_entries(&c, WeekKey::new(2025, 2)).len(), 1);
}

#[test]
fn test_chronological_view_is_newest_first_with_undated_last() {
    let c = journal();
    let contents: Vec<&str> = chronological(&c)
        .iter()
        .map(|p| p.entry.content.as_str())
        .collect();
    assert_eq!(
        contents,
        vec!["new week", "code review", "kickoff", "sunday release", "lost timestamp"]
    );
}

#[test]
fn test_current_week_uses_iso_rules() {
    assert_eq!(current_week_key(&at("2024-12-31 23:59:59")), WeekKey::new(2025, 1));
    assert_eq!(current_week_key(&at("2021-01-03 12:00:00")), WeekKey::new(2020, 53));
    assert_eq!(current_week_key(&at("2025-06-15 12:00:00")), WeekKey::new(2025, 24));
}

#[test]
fn test_week_key_parse_and_display() {
    for s in ["2025-W01", "2025-w1", "2025W01", "2025-1"] {
        assert_eq!(WeekKey::parse(s).unwrap(), WeekKey::new(2025, 1), "{s}");
    }
    assert_eq!(WeekKey::parse("2020-W53").unwrap(), WeekKey::new(2020, 53));
    assert!(matches!(WeekKey::parse("2025-W53"), Err(AppError::InvalidWeek(_))));
    assert!(matches!(WeekKey::parse("2025-W00"), Err(AppError::InvalidWeek(_))));
    assert!(WeekKey::parse("next week").is_err());

    let k = WeekKey::new(2025, 1);
    assert_eq!(k.to_string(), "2025-W01");
    assert_eq!(k.span_label(), "2024-12-30 → 2025-01-05");
}

#[test]
fn test_timezone_parsing() {
    assert_eq!(parse_timezone("+08:00").unwrap().local_minus_utc(), 8 * 3600);
    assert_eq!(parse_timezone("+8").unwrap().local_minus_utc(), 8 * 3600);
    assert_eq!(parse_timezone("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 30 * 60));
    assert_eq!(parse_timezone("UTC").unwrap().local_minus_utc(), 0);
    assert_eq!(parse_timezone("GMT+01:00").unwrap().local_minus_utc(), 3600);

    assert!(matches!(parse_timezone("Asia/Shanghai"), Err(AppError::InvalidTimezone(_))));
    assert!(parse_timezone("+15:00").is_err());
}

#[test]
fn test_timestamp_and_week_cell_parsing() {
    let tz = parse_timezone("+08:00").unwrap();

    assert_eq!(parse_timestamp("2025/01/02 09:30", &tz), Some(at("2025-01-02 09:30:00")));
    assert_eq!(parse_timestamp("2025-01-02", &tz), Some(at("2025-01-02 00:00:00")));
    assert_eq!(
        parse_timestamp("2025-01-02 01:00:00 +0000", &tz),
        Some(at("2025-01-02 09:00:00"))
    );
    assert_eq!(parse_timestamp("", &tz), None);
    assert_eq!(parse_timestamp("12345678", &tz), None);

    assert_eq!(parse_week_cell("52.0"), Some(52));
    assert_eq!(parse_week_cell(" 7 "), Some(7));
    assert_eq!(parse_week_cell("52.5"), None);
    assert_eq!(parse_week_cell(""), None);
}
