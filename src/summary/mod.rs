//! Summary producers: turn a week of log lines into a digest.
//!
//! A producer either answers in one piece or hands back a lazy stream of
//! text chunks. Streams are finite and can be consumed once.

mod digest;
mod openai;

pub use digest::DigestProducer;
pub use openai::{ChatCompletionProducer, SseChunks};

use crate::config::SummaryConfig;
use crate::errors::{AppError, AppResult};

/// Answer of every producer when handed zero entries.
pub const NOTHING_TO_SUMMARIZE: &str = "Nothing to summarize.";

pub type ChunkStream = Box<dyn Iterator<Item = AppResult<String>>>;

pub enum SummaryOutput {
    Complete(String),
    Stream(ChunkStream),
}

impl SummaryOutput {
    pub fn is_stream(&self) -> bool {
        matches!(self, SummaryOutput::Stream(_))
    }
}

pub trait SummaryProducer {
    fn name(&self) -> &str;

    /// `entries` are ordered, already formatted lines; `scope_label` names
    /// the period they cover (e.g. `2025-W01`).
    fn summarize(&self, entries: &[String], scope_label: &str) -> AppResult<SummaryOutput>;
}

/// Build the producer selected in the configuration.
pub fn from_config(cfg: &SummaryConfig) -> AppResult<Box<dyn SummaryProducer>> {
    match cfg.provider.to_ascii_lowercase().as_str() {
        "local" | "digest" => Ok(Box::new(DigestProducer::new())),
        "openai" | "chat" => Ok(Box::new(ChatCompletionProducer::from_config(cfg)?)),
        other => Err(AppError::Config(format!(
            "unknown summary provider '{}', expected 'local' or 'openai'",
            other
        ))),
    }
}
