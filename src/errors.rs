//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
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
    // Storage
    // ---------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database not found: {0}; run `init` first")]
    DatabaseMissing(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Input decoding
    // ---------------------------
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML input: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    // ---------------------------
    // Duty catalog
    // ---------------------------
    #[error("No active duty types in the catalog; run `catalog --seed` first")]
    DutyCatalogEmpty,

    #[error("Required duty type '{0}' is missing from the catalog")]
    RequiredDutyTypeMissing(String),

    #[error("Duty type '{0}' is already active in the catalog")]
    DuplicateDutyType(String),

    #[error("Unknown duty type: {0}")]
    UnknownDutyType(String),

    #[error("Catalog already populated ({0} rows); use --force to seed anyway")]
    CatalogNotEmpty(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
