use clap::{Parser, Subcommand};

/// Command-line interface definition for rWeeklog
/// Work-log journal with ISO-week views and weekly summaries
#[derive(Parser)]
#[command(
    name = "rweeklog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A personal work-log journal: append entries, browse them by ISO week, summarize the week",
    long_about = None
)]
pub struct Cli {
    /// Override the shared table path (useful for tests or a second journal)
    #[arg(global = true, long = "table")]
    pub table: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Freeze the clock at this reference-zone time (YYYY-MM-DD HH:MM:SS)
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and an empty log table
    Init,

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Upgrade the configuration file if needed")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Append a log entry stamped with the current time
    Add {
        /// What you did
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Replace the text of an entry (the timestamp is kept)
    Edit {
        /// Entry number as shown by `list` / `weeks`
        position: usize,

        /// New text
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Delete an entry
    Del {
        /// Entry number as shown by `list` / `weeks`
        position: usize,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List entries, newest first
    List {
        #[arg(long = "week", short = 'w', help = "Only this ISO week (e.g. 2025-W01)")]
        week: Option<String>,

        #[arg(long = "limit", short = 'n', help = "Show at most N entries")]
        limit: Option<usize>,
    },

    /// Show entries grouped by ISO week, most recent week first
    Weeks {
        #[arg(long = "week", short = 'w', help = "Only this ISO week (e.g. 2025-W01)")]
        week: Option<String>,
    },

    /// Summarize a week (default: the current one)
    Summary {
        #[arg(long = "week", short = 'w', help = "ISO week to summarize (e.g. 2025-W01)")]
        week: Option<String>,

        #[arg(long = "no-stream", help = "Print the summary only once it is complete")]
        no_stream: bool,
    },

    /// Interactive session: the summary is cached until the log changes
    Shell,
}
