//! Text views of the journal: flat list and week groups.
//! Positions are printed 1-based; they are storage positions, which is what
//! `edit` and `del` accept.

use crate::models::week::{Positioned, WeekGroup, WeekKey};
use crate::utils::table::{Column, Table};
use ansi_term::Colour;

const CONTENT_WIDTH: usize = 60;

fn when(p: &Positioned<'_>) -> String {
    if p.entry.is_time_valid() {
        p.entry.raw_timestamp.clone()
    } else {
        format!("⚠ {}", p.entry.raw_timestamp)
    }
}

fn week_cell(p: &Positioned<'_>) -> String {
    p.entry
        .week
        .map(|k| k.to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// Flat list, in the order given.
pub fn render_list(items: &[Positioned<'_>]) -> String {
    let pos_w = items
        .iter()
        .map(|p| (p.position + 1).to_string().len() + 1)
        .max()
        .unwrap_or(2)
        .max(2);
    let when_w = items
        .iter()
        .map(|p| when(p).chars().count())
        .max()
        .unwrap_or(19)
        .max(19);

    let mut table = Table::new(vec![
        Column::new("#", pos_w),
        Column::new("When", when_w),
        Column::new("Week", 8),
        Column::new("Content", CONTENT_WIDTH),
    ]);

    for p in items {
        table.add_row(vec![
            format!("#{}", p.position + 1),
            when(p),
            week_cell(p),
            p.entry.content.clone(),
        ]);
    }

    table.render()
}

fn group_header(key: &WeekKey, len: usize, is_current: bool) -> String {
    let plural = if len == 1 { "entry" } else { "entries" };
    let text = format!("{}  {}  · {} {}", key, key.span_label(), len, plural);
    if is_current {
        format!("{} {}", Colour::Green.bold().paint(text), Colour::Green.paint("(current week)"))
    } else {
        Colour::Cyan.bold().paint(text).to_string()
    }
}

fn entry_lines(out: &mut String, items: &[Positioned<'_>]) {
    for p in items {
        let prefix = format!("    #{:<3} {}  ", p.position + 1, p.entry.short_time());
        let indent = " ".repeat(prefix.chars().count());
        let opts = textwrap::Options::new(CONTENT_WIDTH + prefix.chars().count())
            .initial_indent(&prefix)
            .subsequent_indent(&indent);
        for line in textwrap::wrap(&p.entry.content, opts) {
            out.push_str(&line);
            out.push('\n');
        }
    }
}

/// Week groups (most recent first) followed by the undated bucket.
pub fn render_weeks(
    groups: &[(WeekKey, WeekGroup<'_>)],
    current: WeekKey,
    undated: &[Positioned<'_>],
) -> String {
    let mut out = String::new();

    for (key, group) in groups {
        out.push_str(&group_header(key, group.len(), *key == current));
        out.push('\n');
        entry_lines(&mut out, &group.entries);
        out.push('\n');
    }

    if !undated.is_empty() {
        out.push_str(
            &Colour::Yellow
                .bold()
                .paint(format!("Undated · {} with an unreadable timestamp", undated.len()))
                .to_string(),
        );
        out.push('\n');
        entry_lines(&mut out, undated);
    }

    out
}
