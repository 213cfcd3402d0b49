use std::error::Error as StdError;
use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

pub type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid migration pass: {value} {location}")]
    InvalidMigrationPass {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid serial strategy: {value} {location}")]
    InvalidSerialStrategy {
        value: String,
        location: ErrorLocation,
    },

    #[error("User not found: {key} {location}")]
    NotFound { key: String, location: ErrorLocation },

    #[error("Key already exists: {key} {location}")]
    KeyExists { key: String, location: ErrorLocation },

    #[error("Serial space exhausted for prefix {prefix} {location}")]
    SerialExhausted {
        prefix: String,
        location: ErrorLocation,
    },

    #[error("Store error: {source} {location}")]
    Store {
        #[source]
        source: BoxedSource,
        location: ErrorLocation,
    },

    #[error("Document serialization error: {source} {location}")]
    Serde {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound {
            key: key.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn key_exists<S: Into<String>>(key: S) -> Self {
        Self::KeyExists {
            key: key.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn serial_exhausted<S: Into<String>>(prefix: S) -> Self {
        Self::SerialExhausted {
            prefix: prefix.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Wrap a backend failure (connection, commit, decode) raised by a store implementation.
    #[track_caller]
    pub fn store<E: Into<BoxedSource>>(source: E) -> Self {
        Self::Store {
            source: source.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serde {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
