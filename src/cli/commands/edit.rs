use crate::cli::commands::{build_store, to_index};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Replace the text of one entry.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit { position, content } = &cli.command {
        let idx = to_index(*position)?;
        let text = content.join(" ");

        let mut session = Session::open(build_store(cli, cfg)?);
        session.collection()?;
        session.edit_at(idx, &text)?;

        success(format!("Entry #{} updated.", position));
    }

    Ok(())
}
