use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// The two one-time passes of the identifier migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPass {
    /// Re-key legacy (email keyed) records under canonical identifiers
    KeyMigration,
    /// Write the canonical identifier into the `uid` field
    FieldBackfill,
}

impl MigrationPass {
    /// Passes in execution order
    pub const ALL: [MigrationPass; 2] = [Self::KeyMigration, Self::FieldBackfill];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyMigration => "key_migration",
            Self::FieldBackfill => "field_backfill",
        }
    }
}

impl FromStr for MigrationPass {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "key_migration" => Ok(Self::KeyMigration),
            "field_backfill" => Ok(Self::FieldBackfill),
            _ => Err(CoreError::InvalidMigrationPass {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for MigrationPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
