//! Unified application error type.
//! Every module (table adapters excluded, see `table::TableError`) returns
//! `AppError`, so the CLI layer has a single place to report failures.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Log store
    // ---------------------------
    #[error("Invalid entry: {0}")]
    Validation(String),

    /// `position` is 0-based; the message shows it the way the CLI numbers entries.
    #[error("No entry #{} (the log holds {} entries), reload and retry", .position + 1, .len)]
    Index { position: usize, len: usize },

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Cannot load the log right now, try again later: {0}")]
    TransientFetch(String),

    #[error("Write to the log table was not confirmed: {0}")]
    WriteFailure(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid ISO week: {0}")]
    InvalidWeek(String),

    #[error("Invalid timezone offset: {0}")]
    InvalidTimezone(String),

    // ---------------------------
    // Summary producer
    // ---------------------------
    #[error("Summary producer error: {0}")]
    Producer(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
