use crate::cli::commands::{build_store, parse_week, print_weeks};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Weeks { week } = &cli.command {
        let week = parse_week(week)?;
        let session = Session::open(build_store(cli, cfg)?);
        print_weeks(&session, week)?;
    }
    Ok(())
}
