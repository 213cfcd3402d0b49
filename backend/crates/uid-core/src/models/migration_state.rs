use crate::MigrationPass;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted completion marker for one migration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationState {
    pub pass: MigrationPass,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl MigrationState {
    pub fn pending(pass: MigrationPass) -> Self {
        Self {
            pass,
            completed: false,
            completed_at: None,
        }
    }

    pub fn completed(pass: MigrationPass, at: DateTime<Utc>) -> Self {
        Self {
            pass,
            completed: true,
            completed_at: Some(at),
        }
    }
}
