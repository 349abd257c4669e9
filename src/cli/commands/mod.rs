//! Subcommand handlers plus the views they share with the interactive shell.

pub mod add;
pub mod config;
pub mod del;
pub mod edit;
pub mod init;
pub mod list;
pub mod shell;
pub mod summary;
pub mod weeks;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::session::Session;
use crate::core::store::LogStore;
use crate::core::summary::SummarySource;
use crate::core::weeks::{chronological, group_by_week, ordered_groups, undated};
use crate::errors::{AppError, AppResult};
use crate::models::week::WeekKey;
use crate::summary::SummaryProducer;
use crate::table;
use crate::ui::messages::{header, info, warning};
use crate::ui::render::{render_list, render_weeks};
use crate::utils::clock::{Clock, FixedClock, SystemClock};
use crate::utils::date::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use std::io::{self, Write};

/// Build the log store from config plus global flags.
pub fn build_store(cli: &Cli, cfg: &Config) -> AppResult<LogStore> {
    let tz = cfg.tz()?;
    let clock: Box<dyn Clock> = match &cli.now {
        Some(s) => Box::new(FixedClock(
            NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
                .map_err(|_| AppError::InvalidTimestamp(s.clone()))?,
        )),
        None => Box::new(SystemClock::new(tz)),
    };

    let source = cfg.table_path().to_string_lossy().to_string();
    Ok(LogStore::new(table::open(cfg), source, tz, clock).with_max_staleness(cfg.read_ttl()))
}

/// Entry numbers on the command line are 1-based.
pub fn to_index(number: usize) -> AppResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| AppError::Validation("entry numbers start at 1".into()))
}

pub fn parse_week(week: &Option<String>) -> AppResult<Option<WeekKey>> {
    week.as_deref().map(WeekKey::parse).transpose()
}

const EMPTY_LOG: &str = "No log entries yet. Write one with `rweeklog add <text>`.";

pub fn print_list(session: &Session, week: Option<WeekKey>, limit: Option<usize>) -> AppResult<()> {
    let collection = session.collection()?;
    if collection.is_empty() {
        info(EMPTY_LOG);
        return Ok(());
    }

    let items: Vec<_> = chronological(collection)
        .into_iter()
        .filter(|p| week.is_none() || p.entry.week == week)
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if items.is_empty() {
        if let Some(w) = week {
            info(format!("No entries in {}.", w));
        }
        return Ok(());
    }

    print!("{}", render_list(&items));
    Ok(())
}

pub fn print_weeks(session: &Session, week: Option<WeekKey>) -> AppResult<()> {
    let collection = session.collection()?;
    if collection.is_empty() {
        info(EMPTY_LOG);
        return Ok(());
    }

    let mut map = group_by_week(collection);
    if let Some(w) = week {
        map.retain(|k, _| *k == w);
        if map.is_empty() {
            info(format!("No entries in {}.", w));
            return Ok(());
        }
    }

    let groups = ordered_groups(map);
    let undated = if week.is_none() {
        undated(collection)
    } else {
        Vec::new()
    };

    print!("{}", render_weeks(&groups, session.current_week(), &undated));
    Ok(())
}

pub fn print_summary(
    session: &mut Session,
    producer: &dyn SummaryProducer,
    week: Option<WeekKey>,
    stream: bool,
) -> AppResult<()> {
    let scope = week.unwrap_or_else(|| session.current_week());
    header(format!("Summary {} ({})", scope, scope.span_label()));

    let mut printed_any = false;
    let mut on_chunk = |chunk: &str| {
        if stream {
            print!("{}", chunk);
            let _ = io::stdout().flush();
            printed_any = true;
        }
    };

    let (text, source) = session.summary(Some(scope), producer, &mut on_chunk)?;

    if !printed_any {
        print!("{}", text);
    } else if source == SummarySource::Failed {
        println!();
        print!("{}", text);
    }
    if !text.ends_with('\n') {
        println!();
    }

    match source {
        SummarySource::Cache => info("(cached, no changes since the last summary)"),
        SummarySource::Failed => warning("The log itself is unaffected; try again later."),
        SummarySource::Producer | SummarySource::NoEntries => {}
    }
    Ok(())
}
