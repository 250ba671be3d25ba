//! Storage-specific error types
//!
//! Errors raised by the cafe repository. Absence, constraint violations and
//! engine failures are kept apart so callers can react to each one.

use thiserror::Error;

/// Errors that can occur while reading or writing the cafe table
#[derive(Error, Debug)]
pub enum StoreError {
    /// No cafe with the given id exists
    #[error("Cafe not found: {0}")]
    NotFound(i64),

    /// A unique constraint rejected the write (duplicate cafe name)
    #[error("Conflicting cafe: {0}")]
    Conflict(String),

    /// The storage engine or connection failed
    #[error("Storage unavailable: {0}")]
    Unavailable(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            _ => StoreError::Unavailable(err),
        }
    }
}
