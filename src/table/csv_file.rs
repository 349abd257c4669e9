use super::{COLUMNS, RawRow, RemoteTable, Table, TableError};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Shared table stored as a CSV file (typically on a synced or network drive).
///
/// `source` is the file path. A missing or zero-byte file is an empty table.
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers never observe a half-written table.
#[derive(Debug, Default)]
pub struct CsvFileTable;

impl CsvFileTable {
    pub fn new() -> Self {
        Self
    }
}

/// Column positions resolved from the header row.
struct Layout {
    timestamp: usize,
    content: usize,
    week_number: Option<usize>,
    iso_year: Option<usize>,
    iso_week: Option<usize>,
}

fn normalize_header(h: &str) -> String {
    h.trim()
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase()
        .replace(['_', ' '], "")
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self, TableError> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.contains(&normalize_header(h).as_str()))
        };

        let timestamp = find(&["timestamp", "time", "datetime"])
            .ok_or_else(|| TableError::Malformed("missing `timestamp` column".into()))?;
        let content = find(&["content", "text", "entry"])
            .ok_or_else(|| TableError::Malformed("missing `content` column".into()))?;

        let known = headers.len();
        let layout = Self {
            timestamp,
            content,
            week_number: find(&["weeknumber", "week"]),
            iso_year: find(&["isoyear", "year"]),
            iso_week: find(&["isoweek"]),
        };

        let used = 2
            + layout.week_number.is_some() as usize
            + layout.iso_year.is_some() as usize
            + layout.iso_week.is_some() as usize;
        if known > used {
            warn!(
                extra = known - used,
                "table has columns outside the canonical set; they are dropped on the next write"
            );
        }

        Ok(layout)
    }

    fn row(&self, rec: &StringRecord) -> RawRow {
        let cell = |i: usize| rec.get(i).unwrap_or("").to_string();
        let opt = |i: Option<usize>| {
            i.and_then(|i| rec.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        RawRow {
            timestamp: cell(self.timestamp),
            content: cell(self.content),
            week_number: opt(self.week_number),
            iso_year: opt(self.iso_year),
            iso_week: opt(self.iso_week),
        }
    }
}

fn transport(path: &Path, e: impl std::fmt::Display) -> TableError {
    TableError::Transport(format!("{}: {}", path.display(), e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "table.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

impl RemoteTable for CsvFileTable {
    fn read(&self, source: &str, _max_staleness: Duration) -> Result<Table, TableError> {
        let path = Path::new(source);

        let meta = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(source, "table file does not exist yet, treating as empty");
                return Ok(Table::empty());
            }
            Err(e) => return Err(transport(path, e)),
        };
        if meta.len() == 0 {
            return Ok(Table::empty());
        }

        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_path(path)
            .map_err(|e| transport(path, e))?;

        let headers = rdr
            .headers()
            .map_err(|e| TableError::Malformed(e.to_string()))?
            .clone();
        let layout = Layout::from_headers(&headers)?;

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(|e| TableError::Malformed(e.to_string()))?;

            // Trailing blank lines left behind by spreadsheet editors.
            if rec.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(layout.row(&rec));
        }

        debug!(source, rows = rows.len(), "table read");
        Ok(Table::from_rows(rows))
    }

    fn write(&self, source: &str, table: &Table) -> Result<(), TableError> {
        let path = Path::new(source);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| transport(parent, e))?;
        }

        let tmp = temp_path(path);
        {
            let mut wtr = Writer::from_path(&tmp).map_err(|e| transport(&tmp, e))?;
            wtr.write_record(COLUMNS).map_err(|e| transport(&tmp, e))?;
            for row in &table.rows {
                wtr.write_record(row.cells())
                    .map_err(|e| transport(&tmp, e))?;
            }
            wtr.flush().map_err(|e| transport(&tmp, e))?;
        }

        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(transport(path, e));
        }

        debug!(source, rows = table.len(), "table written");
        Ok(())
    }
}
