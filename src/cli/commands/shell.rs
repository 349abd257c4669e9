//! Interactive session. One `Session` lives for the whole loop, so the
//! weekly summary stays cached until an entry is added, edited or deleted.

use crate::cli::commands::{
    build_store, parse_week, print_list, print_summary, print_weeks, to_index,
};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::session::{Session, WorkingSet};
use crate::errors::{AppError, AppResult};
use crate::summary::{self, SummaryProducer};
use crate::ui::messages::{error, info, success, warning};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  add <text>          append an entry
  edit <n> <text>     replace the text of entry #n
  del <n>             delete entry #n
  list [week]         entries, newest first
  weeks [week]        entries grouped by ISO week
  summary [week]      weekly summary (cached until the log changes)
  reload              re-read the shared table
  help                this text
  quit                leave";

fn parse_number(arg: &str) -> AppResult<usize> {
    let n: usize = arg
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("'{}' is not an entry number", arg.trim())))?;
    to_index(n)
}

fn optional_week(arg: &str) -> AppResult<Option<crate::models::week::WeekKey>> {
    let arg = arg.trim();
    if arg.is_empty() {
        Ok(None)
    } else {
        parse_week(&Some(arg.to_string()))
    }
}

/// Run one shell line. `Ok(false)` ends the loop.
fn run_line(
    session: &mut Session,
    producer: &dyn SummaryProducer,
    stream: bool,
    line: &str,
) -> AppResult<bool> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));

    match cmd {
        "" => {}
        "quit" | "exit" | "q" => return Ok(false),
        "help" | "?" => println!("{}", HELP),
        "add" => {
            let c = session.append(rest)?;
            success(format!("Saved #{}.", c.len()));
        }
        "edit" => {
            let (n, text) = rest.trim().split_once(' ').ok_or_else(|| {
                AppError::Validation("usage: edit <n> <text>".into())
            })?;
            let idx = parse_number(n)?;
            session.edit_at(idx, text)?;
            success(format!("Entry #{} updated.", idx + 1));
        }
        "del" => {
            let idx = parse_number(rest)?;
            let removed = session.delete_at(idx)?;
            success(format!(
                "Entry #{} from {} deleted.",
                idx + 1,
                removed.raw_timestamp
            ));
        }
        "list" => print_list(session, optional_week(rest)?, None)?,
        "weeks" => print_weeks(session, optional_week(rest)?)?,
        "summary" => print_summary(session, producer, optional_week(rest)?, stream)?,
        "reload" => {
            let n = session.refresh()?.len();
            info(format!("Reloaded: {} entries.", n));
        }
        other => warning(format!("Unknown command '{}'. Type `help`.", other)),
    }

    Ok(true)
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let producer = summary::from_config(&cfg.summary)?;
    let mut session = Session::open(build_store(cli, cfg)?);

    match session.working_set() {
        WorkingSet::Loaded(c) => info(format!(
            "{} entries loaded, current week {}. Type `help` for commands.",
            c.len(),
            session.current_week()
        )),
        WorkingSet::Unknown(reason) => warning(format!(
            "Cannot load the log right now ({}). Use `reload` to retry.",
            reason
        )),
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("rweeklog> ");
        let _ = io::stdout().flush();

        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match run_line(&mut session, producer.as_ref(), true, &line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => error(e),
        }
    }

    Ok(())
}
