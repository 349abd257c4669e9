use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::table::{CsvFileTable, RemoteTable, Table};
use std::time::Duration;
use tracing::info;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the shared log table, with the canonical header, unless it already exists
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.table.clone(), cli.test)?;
    let table_path = cfg.table_path();
    let source = table_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rWeeklog…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Log table  : {}", source);

    let file = CsvFileTable::new();
    if table_path.exists() {
        // An existing table is kept as is; just make sure it is readable.
        let existing = file
            .read(&source, Duration::ZERO)
            .map_err(|e| AppError::TransientFetch(e.to_string()))?;
        println!("✅ Existing log table kept ({} entries)", existing.len());
    } else {
        file.write(&source, &Table::empty())
            .map_err(|e| AppError::WriteFailure(e.to_string()))?;
        println!("✅ Empty log table created");
    }

    info!(operation = "init", table = %source, "initialized");
    println!("🎉 rWeeklog initialization completed!");
    Ok(())
}
