//! Unified application error type.
//! All modules (db, core, cli, import, export) return AppError to keep the
//! error handling consistent and easy to manage.

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
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Import / parsing errors
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid sprint window: {0}")]
    InvalidWindow(String),

    // ---------------------------
    // Sprint selection errors
    // ---------------------------
    #[error("Unknown sprint window: {0}")]
    UnknownSprint(String),

    #[error("No sprint window available (ingest a batch or pass --sprint)")]
    NoSprintWindow,

    #[error("No history entry for sprint {0} on {1}")]
    NoHistoryEntry(String, String),

    #[error("Unknown alert id: {0}")]
    UnknownAlert(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
