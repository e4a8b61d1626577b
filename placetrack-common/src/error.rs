//! Common error types for PlaceTrack

use std::collections::BTreeMap;
use thiserror::Error;

/// Common result type for PlaceTrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by repositories and HTTP handlers.
///
/// `Validation`/`FieldValidation` surface as 400, `NotFound` as 404,
/// `Conflict` as 400 (duplicate unique key), everything else as 500.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found, or zero rows affected
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed required input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Validation failure with a per-field detail map
    #[error("Validation failed")]
    FieldValidation(BTreeMap<String, String>),

    /// Duplicate unique key (e.g. email already registered)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map a sqlx error to `Conflict` when it is a unique-key violation,
    /// keeping `Database` otherwise.
    pub fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Error::Conflict(conflict_message.to_string());
            }
        }
        Error::Database(err)
    }
}
