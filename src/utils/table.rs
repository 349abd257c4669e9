//! Table rendering for CLI outputs.
//!
//! Widths are measured in terminal columns (`unicode-width`), so CJK text
//! and emoji line up. The last column may wrap onto continuation lines.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

/// Left-align `s` in `width` terminal columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render with a header line. The last column is wrapped at its width.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some((last, fixed)) = self.columns.split_last() else {
            return out;
        };
        let indent: usize = fixed.iter().map(|c| c.width + 1).sum();

        for col in fixed {
            out.push_str(&pad_right(&col.header, col.width));
            out.push(' ');
        }
        out.push_str(&last.header);
        out.push('\n');

        for row in &self.rows {
            for (i, col) in fixed.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad_right(cell, col.width));
                out.push(' ');
            }

            let text = row.get(fixed.len()).map(String::as_str).unwrap_or("");
            let lines = textwrap::wrap(text, last.width.max(10));
            for (n, line) in lines.iter().enumerate() {
                if n > 0 {
                    out.push_str(&" ".repeat(indent));
                }
                out.push_str(line);
                out.push('\n');
            }
            if lines.is_empty() {
                out.push('\n');
            }
        }

        out
    }
}
