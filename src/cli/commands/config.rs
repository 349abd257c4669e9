use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::config::migrate::{migrate_config, missing_fields};
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = &cli.command
    {
        let path = Config::config_file();

        if *print_config {
            ConfigLogic::print(cfg)?;
        }

        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; built-in defaults are in use.",
                    path.display()
                ));
            } else {
                let missing = missing_fields(&path)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!(
                        "Missing fields (defaults apply): {}. Run `rweeklog config --migrate`.",
                        missing.join(", ")
                    ));
                }
            }
        }

        if *migrate {
            if !path.exists() {
                info("No configuration file to migrate.");
            } else if cli.test {
                info("Test mode: configuration file left untouched.");
            } else {
                let changes = migrate_config(&path)?;
                if changes.is_empty() {
                    info("Configuration already up to date.");
                } else {
                    success(format!("Configuration migrated: {}", changes.join("; ")));
                }
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
        }
    }

    Ok(())
}
