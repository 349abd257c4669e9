use super::{NOTHING_TO_SUMMARIZE, SummaryOutput, SummaryProducer};
use crate::errors::AppResult;

/// Offline producer: a deterministic digest grouped by day, streamed line
/// by line.
///
/// Lines shaped like `[Mon 12-30] text` are grouped under their bracketed
/// label; anything else is listed under "other".
#[derive(Debug, Default)]
pub struct DigestProducer;

impl DigestProducer {
    pub fn new() -> Self {
        Self
    }
}

fn split_label(line: &str) -> (&str, &str) {
    if let Some(rest) = line.strip_prefix('[')
        && let Some((label, text)) = rest.split_once("] ")
    {
        return (label, text.trim());
    }
    ("other", line.trim())
}

impl SummaryProducer for DigestProducer {
    fn name(&self) -> &str {
        "local"
    }

    fn summarize(&self, entries: &[String], scope_label: &str) -> AppResult<SummaryOutput> {
        if entries.is_empty() {
            return Ok(SummaryOutput::Complete(NOTHING_TO_SUMMARIZE.to_string()));
        }

        // Keep first-seen day order; input is already chronological.
        let mut days: Vec<(&str, Vec<&str>)> = Vec::new();
        for line in entries {
            let (label, text) = split_label(line);
            match days.iter_mut().find(|(l, _)| *l == label) {
                Some((_, items)) => items.push(text),
                None => days.push((label, vec![text])),
            }
        }

        let mut lines = vec![format!(
            "{}: {} {} across {} {}\n",
            scope_label,
            entries.len(),
            if entries.len() == 1 { "entry" } else { "entries" },
            days.len(),
            if days.len() == 1 { "day" } else { "days" },
        )];
        for (label, items) in &days {
            lines.push(format!("• {}: {}\n", label, items.join("; ")));
        }

        Ok(SummaryOutput::Stream(Box::new(lines.into_iter().map(Ok))))
    }
}
