use rweeklog::config::SummaryConfig;
use rweeklog::core::summary::{
    NO_ENTRIES_SENTINEL, SummaryCache, SummarySource, SummaryState, format_entries,
};
use rweeklog::core::weeks::week_entries;
use rweeklog::errors::{AppError, AppResult};
use rweeklog::models::collection::LogCollection;
use rweeklog::models::entry::LogEntry;
use rweeklog::models::week::WeekKey;
use rweeklog::summary::{
    self, DigestProducer, NOTHING_TO_SUMMARIZE, SseChunks, SummaryOutput, SummaryProducer,
};
use std::cell::Cell;
use std::io::Cursor;

mod common;
use common::at;

/// Scripted producer: fixed chunks, optional failure, call counter.
struct Scripted {
    chunks: Vec<&'static str>,
    fail_with: Option<&'static str>,
    fail_mid_stream: bool,
    calls: Cell<usize>,
}

impl Scripted {
    fn streaming(chunks: Vec<&'static str>) -> Self {
        Self {
            chunks,
            fail_with: None,
            fail_mid_stream: false,
            calls: Cell::new(0),
        }
    }

    fn failing(msg: &'static str) -> Self {
        Self {
            fail_with: Some(msg),
            ..Self::streaming(vec![])
        }
    }
}

impl SummaryProducer for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn summarize(&self, _entries: &[String], _scope: &str) -> AppResult<SummaryOutput> {
        self.calls.set(self.calls.get() + 1);
        if let Some(msg) = self.fail_with {
            return Err(AppError::Producer(msg.to_string()));
        }

        let mut items: Vec<AppResult<String>> =
            self.chunks.iter().map(|c| Ok(c.to_string())).collect();
        if self.fail_mid_stream {
            items.push(Err(AppError::Producer("connection dropped".into())));
        }
        Ok(SummaryOutput::Stream(Box::new(items.into_iter())))
    }
}

fn week_one() -> LogCollection {
    LogCollection::from_entries(vec![
        LogEntry::new(at("2025-01-02 14:00:00"), "code review"),
        LogEntry::new(at("2024-12-30 09:00:00"), "kickoff"),
    ])
}

#[test]
fn test_entries_are_formatted_with_day_labels_in_order() {
    let c = week_one();
    let lines = format_entries(&week_entries(&c, WeekKey::new(2025, 1)));
    assert_eq!(lines, vec!["[Mon 12-30] kickoff", "[Thu 01-02] code review"]);
}

#[test]
fn test_streamed_chunks_are_forwarded_and_concatenated() {
    let c = week_one();
    let producer = Scripted::streaming(vec!["Busy ", "week", "."]);
    let mut cache = SummaryCache::new();
    let mut seen = Vec::new();

    let (text, src) = cache.get_or_produce(
        &c,
        &at("2025-01-03 10:00:00"),
        &producer,
        &mut |chunk: &str| seen.push(chunk.to_string()),
    );

    assert_eq!(src, SummarySource::Producer);
    assert_eq!(text, "Busy week.");
    assert_eq!(seen, vec!["Busy ", "week", "."]);
    assert_eq!(
        cache.state(),
        &SummaryState::Ready {
            scope: WeekKey::new(2025, 1),
            text: "Busy week.".into()
        }
    );
}

#[test]
fn test_cache_hit_skips_the_producer() {
    let c = week_one();
    let producer = Scripted::streaming(vec!["done"]);
    let mut cache = SummaryCache::default();
    let now = at("2025-01-03 10:00:00");

    cache.get_or_produce(&c, &now, &producer, &mut |_: &str| {});
    let mut replay = String::new();
    let (text, src) = cache.get_or_produce(&c, &now, &producer, &mut |s: &str| {
        replay.push_str(s)
    });

    assert_eq!(src, SummarySource::Cache);
    assert_eq!(text, "done");
    assert_eq!(replay, "done");
    assert_eq!(producer.calls.get(), 1);

    cache.invalidate();
    cache.invalidate();
    assert_eq!(cache.state(), &SummaryState::Empty);
    cache.get_or_produce(&c, &now, &producer, &mut |_: &str| {});
    assert_eq!(producer.calls.get(), 2);
}

#[test]
fn test_empty_week_returns_sentinel_without_calling_producer() {
    let producer = Scripted::streaming(vec!["never"]);
    let mut cache = SummaryCache::new();

    for c in [LogCollection::new(), week_one()] {
        let (text, src) =
            cache.get_or_produce(&c, &at("2025-03-10 10:00:00"), &producer, &mut |_: &str| {});
        assert_eq!(text, NO_ENTRIES_SENTINEL);
        assert_eq!(src, SummarySource::NoEntries);
    }

    assert_eq!(producer.calls.get(), 0);
    assert_eq!(cache.state(), &SummaryState::Empty);
}

#[test]
fn test_producer_failure_is_reported_and_not_cached() {
    let c = week_one();
    let producer = Scripted::failing("quota exceeded");
    let mut cache = SummaryCache::new();
    let now = at("2025-01-03 10:00:00");

    let (text, src) = cache.get_or_produce(&c, &now, &producer, &mut |_: &str| {});
    assert_eq!(src, SummarySource::Failed);
    assert!(text.starts_with("⚠️ Summary unavailable"));
    assert!(text.contains("quota exceeded"));
    assert_eq!(cache.state(), &SummaryState::Empty);

    cache.get_or_produce(&c, &now, &producer, &mut |_: &str| {});
    assert_eq!(producer.calls.get(), 2);
}

#[test]
fn test_stream_failing_midway_is_a_failure() {
    let c = week_one();
    let producer = Scripted {
        fail_mid_stream: true,
        ..Scripted::streaming(vec!["partial "])
    };
    let mut cache = SummaryCache::new();

    let (text, src) =
        cache.get_or_produce(&c, &at("2025-01-03 10:00:00"), &producer, &mut |_: &str| {});
    assert_eq!(src, SummarySource::Failed);
    assert!(text.contains("connection dropped"));
    assert!(!cache.is_ready());
}

#[test]
fn test_digest_producer_groups_by_day() {
    let lines = vec![
        "[Mon 12-30] kickoff".to_string(),
        "[Mon 12-30] planning".to_string(),
        "[Thu 01-02] code review".to_string(),
    ];

    let out = DigestProducer::new().summarize(&lines, "2025-W01").unwrap();
    assert!(out.is_stream());
    let SummaryOutput::Stream(chunks) = out else {
        unreachable!()
    };
    let text: String = chunks.map(|c| c.unwrap()).collect();

    assert_eq!(
        text,
        "2025-W01: 3 entries across 2 days\n\
         • Mon 12-30: kickoff; planning\n\
         • Thu 01-02: code review\n"
    );

    match DigestProducer::new().summarize(&[], "2025-W01").unwrap() {
        SummaryOutput::Complete(t) => assert_eq!(t, NOTHING_TO_SUMMARIZE),
        SummaryOutput::Stream(_) => panic!("expected a complete answer"),
    }
}

#[test]
fn test_sse_stream_decoding() {
    let body = "\
data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
\n\
data: {\"choices\":[{\"delta\":{\"content\":\"Shipped \"}}]}\n\
\n\
: keep-alive\n\
data: {\"choices\":[{\"delta\":{\"content\":\"the release.\"}}]}\n\
\n\
data: [DONE]\n\
data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n";

    let chunks: Vec<String> = SseChunks::new(Cursor::new(body))
        .map(|c| c.unwrap())
        .collect();
    assert_eq!(chunks, vec!["Shipped ", "the release."]);
}

#[test]
fn test_sse_error_event_ends_the_stream() {
    let body = "\
data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\
data: {\"error\":{\"message\":\"overloaded\"}}\n\
data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n";

    let mut it = SseChunks::new(Cursor::new(body));
    assert_eq!(it.next().unwrap().unwrap(), "Hi");
    match it.next() {
        Some(Err(AppError::Producer(msg))) => assert_eq!(msg, "overloaded"),
        other => panic!("unexpected: {:?}", other.map(|r| r.is_ok())),
    }
    assert!(it.next().is_none());
}

#[test]
fn test_unknown_provider_is_a_config_error() {
    let cfg = SummaryConfig {
        provider: "carrier-pigeon".into(),
        ..SummaryConfig::default()
    };
    assert!(matches!(summary::from_config(&cfg), Err(AppError::Config(_))));

    let local = summary::from_config(&SummaryConfig::default()).unwrap();
    assert_eq!(local.name(), "local");
}
