use uid_core::CoreError;

use error_location::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {source} {location}")]
    Migration {
        source: sqlx::migrate::MigrateError,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Corrupt document {key}: {source} {location}")]
    Document {
        key: String,
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Value out of range for {column}: {value} {location}")]
    OutOfRange {
        column: &'static str,
        value: String,
        location: ErrorLocation,
    },

    #[error("Serial counter exhausted for prefix {prefix} {location}")]
    SerialExhausted {
        prefix: String,
        location: ErrorLocation,
    },

    #[error("Key already exists: {key} {location}")]
    KeyExists { key: String, location: ErrorLocation },

    #[error("Record not found: {key} {location}")]
    NotFound { key: String, location: ErrorLocation },
}

impl DbError {
    #[track_caller]
    pub fn serial_exhausted<S: Into<String>>(prefix: S) -> Self {
        Self::SerialExhausted {
            prefix: prefix.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    #[track_caller]
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::Migration {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Conflicts, misses and exhausted counters keep their meaning; everything else is a store failure.
impl From<DbError> for CoreError {
    #[track_caller]
    fn from(error: DbError) -> Self {
        match error {
            DbError::KeyExists { key, .. } => CoreError::key_exists(key),
            DbError::NotFound { key, .. } => CoreError::not_found(key),
            DbError::SerialExhausted { prefix, .. } => CoreError::serial_exhausted(prefix),
            other => CoreError::store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
