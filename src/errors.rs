//! Unified application error type.
//! All modules (db, core, ledger, cli) return AppError to keep the error
//! handling consistent and easy to manage.

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
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid punch slot: {0}")]
    InvalidSlot(String),

    #[error("Invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),

    // ---------------------------
    // Ledger errors
    // ---------------------------
    #[error("Punch '{slot}' already recorded for {date}")]
    DuplicatePunch { slot: String, date: String },

    #[error("No schedule for this day: {0}")]
    NoScheduleResolved(String),

    #[error("Adjustment quota exhausted for {month}: all {cap} corrections used")]
    QuotaExceeded { month: String, cap: i32 },

    #[error("Malformed punch record: {0}")]
    MalformedPunchRecord(String),

    #[error("Concurrent write conflict: {0}")]
    ConcurrentWriteConflict(String),

    #[error("Punch window closed: {0}")]
    OutsideWindow(String),

    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("Administrator required: {0}")]
    AdminRequired(String),

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
