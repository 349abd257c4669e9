use crate::cli::commands::{build_store, parse_week, print_summary};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::summary;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { week, no_stream } = &cli.command {
        let week = parse_week(week)?;

        let mut summary_cfg = cfg.summary.clone();
        if *no_stream {
            summary_cfg.stream = false;
        }
        let producer = summary::from_config(&summary_cfg)?;

        let mut session = Session::open(build_store(cli, cfg)?);
        session.collection()?;
        print_summary(&mut session, producer.as_ref(), week, !*no_stream)?;
    }
    Ok(())
}
