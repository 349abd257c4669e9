use crate::cli::commands::{build_store, to_index};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { position, yes } = &cli.command {
        let idx = to_index(*position)?;

        let mut session = Session::open(build_store(cli, cfg)?);
        let collection = session.collection()?;
        let entry = collection.get(idx).ok_or(AppError::Index {
            position: idx,
            len: collection.len(),
        })?;

        //
        // Confirmation prompt
        //
        let prompt = format!(
            "Delete entry #{} ({}: {})? This action is irreversible.",
            position, entry.raw_timestamp, entry.content
        );
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let removed = session.delete_at(idx)?;
        success(format!(
            "Entry #{} from {} has been deleted.",
            position, removed.raw_timestamp
        ));
    }

    Ok(())
}
