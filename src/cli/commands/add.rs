use crate::cli::commands::build_store;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Append one entry.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { content } = &cli.command {
        let text = content.join(" ");

        // No initial load: append validates first, then reads fresh itself.
        let mut session = Session::new(build_store(cli, cfg)?);
        let collection = session.append(&text)?;

        if let Some(entry) = collection.entries().last() {
            let week = entry
                .week
                .map(|k| k.to_string())
                .unwrap_or_else(|| "--".into());
            success(format!(
                "Saved #{} at {} ({}).",
                collection.len(),
                entry.raw_timestamp,
                week
            ));
        }
    }

    Ok(())
}
