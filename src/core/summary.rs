//! Session-scoped weekly summary cache.
//!
//! `Empty -> Pending -> Ready`, back to `Empty` on every journal mutation.
//! A `Ready` summary answers only for the week it was produced for.

use crate::core::weeks::{current_week_key, week_entries};
use crate::models::collection::LogCollection;
use crate::models::week::{WeekGroup, WeekKey};
use crate::summary::{SummaryOutput, SummaryProducer};
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

/// Returned, without calling any producer, when the week has no entries.
pub const NO_ENTRIES_SENTINEL: &str = "No log entries this week yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    Empty,
    Pending { scope: WeekKey },
    Ready { scope: WeekKey, text: String },
}

/// Where a returned summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Cache,
    Producer,
    NoEntries,
    Failed,
}

#[derive(Debug)]
pub struct SummaryCache {
    state: SummaryState,
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// `[Mon 12-30] text` lines, one per entry, chronological.
pub fn format_entries(group: &WeekGroup<'_>) -> Vec<String> {
    group
        .entries
        .iter()
        .map(|p| format!("[{}] {}", p.entry.day_label(), p.entry.content))
        .collect()
}

impl SummaryCache {
    pub fn new() -> Self {
        Self {
            state: SummaryState::Empty,
        }
    }

    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SummaryState::Ready { .. })
    }

    /// Drop whatever is held. Idempotent.
    pub fn invalidate(&mut self) {
        if self.state != SummaryState::Empty {
            debug!("summary cache invalidated");
        }
        self.state = SummaryState::Empty;
    }

    /// Summary of the week containing `now`.
    pub fn get_or_produce(
        &mut self,
        collection: &LogCollection,
        now: &NaiveDateTime,
        producer: &dyn SummaryProducer,
        on_chunk: &mut dyn FnMut(&str),
    ) -> (String, SummarySource) {
        self.get_or_produce_for(collection, current_week_key(now), producer, on_chunk)
    }

    /// Summary of `scope`. Chunks are passed to `on_chunk` as they arrive;
    /// a cached answer is passed once, whole. Producer failures come back
    /// as a readable message and leave the cache `Empty`.
    pub fn get_or_produce_for(
        &mut self,
        collection: &LogCollection,
        scope: WeekKey,
        producer: &dyn SummaryProducer,
        on_chunk: &mut dyn FnMut(&str),
    ) -> (String, SummarySource) {
        if let SummaryState::Ready { scope: s, text } = &self.state
            && *s == scope
        {
            debug!(%scope, "summary cache hit");
            on_chunk(text);
            return (text.clone(), SummarySource::Cache);
        }

        let group = week_entries(collection, scope);
        if group.is_empty() {
            self.state = SummaryState::Empty;
            on_chunk(NO_ENTRIES_SENTINEL);
            return (NO_ENTRIES_SENTINEL.to_string(), SummarySource::NoEntries);
        }

        self.state = SummaryState::Pending { scope };
        let lines = format_entries(&group);
        info!(%scope, entries = lines.len(), producer = producer.name(), "producing summary");

        match collect(producer, &lines, &scope.to_string(), on_chunk) {
            Ok(text) => {
                self.state = SummaryState::Ready {
                    scope,
                    text: text.clone(),
                };
                (text, SummarySource::Producer)
            }
            Err(msg) => {
                warn!(%scope, error = %msg, "summary failed");
                self.state = SummaryState::Empty;
                (format!("⚠️ Summary unavailable: {}", msg), SummarySource::Failed)
            }
        }
    }
}

fn collect(
    producer: &dyn SummaryProducer,
    lines: &[String],
    scope_label: &str,
    on_chunk: &mut dyn FnMut(&str),
) -> Result<String, String> {
    match producer
        .summarize(lines, scope_label)
        .map_err(|e| e.to_string())?
    {
        SummaryOutput::Complete(text) => {
            on_chunk(&text);
            Ok(text)
        }
        SummaryOutput::Stream(chunks) => {
            let mut text = String::new();
            for chunk in chunks {
                let chunk = chunk.map_err(|e| e.to_string())?;
                on_chunk(&chunk);
                text.push_str(&chunk);
            }
            Ok(text)
        }
    }
}
