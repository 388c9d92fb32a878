//! Unified application error type.
//! Every module (db, core, cli, viewer) returns AppError so that the
//! command layer can report failures the same way.

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

    #[error("Cannot open store at '{path}': {reason}")]
    StoreOpen { path: String, reason: String },

    // ---------------------------
    // Import errors
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import error: {0}")]
    Import(String),

    // ---------------------------
    // Session errors
    // ---------------------------
    #[error("Batch '{0}' has no games")]
    EmptyBatch(String),

    #[error("No game is waiting for a vote")]
    NoActiveItem,

    #[error("Session error: {0}")]
    Session(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Viewer errors (never fatal, only logged)
    // ---------------------------
    #[error("Viewer error: {0}")]
    Viewer(String),
}

pub type AppResult<T> = Result<T, AppError>;
