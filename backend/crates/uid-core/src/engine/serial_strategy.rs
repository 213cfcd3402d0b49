use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// How new serials are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SerialStrategy {
    /// Highest serial in the snapshot plus one. Two installations migrating
    /// the same collection at once can mint the same serial.
    #[default]
    Scan,
    /// Reserve serials from a per-prefix counter document updated atomically
    /// by the store, raised first to the snapshot maximum.
    Counter,
}

impl SerialStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Counter => "counter",
        }
    }
}

impl FromStr for SerialStrategy {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "scan" => Ok(Self::Scan),
            "counter" => Ok(Self::Counter),
            _ => Err(CoreError::InvalidSerialStrategy {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for SerialStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
