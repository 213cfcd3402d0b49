use crate::{MigrationPass, WriteBatch};

use std::collections::BTreeMap;

use serde::Serialize;

/// A canonical identifier minted for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Key the record had in the snapshot
    pub record_key: String,
    pub identifier: String,
    pub prefix: String,
    pub serial: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingRole,
    KeyCollision { target: String },
    SerialExhausted { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub key: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Writes computed for one pass against a frozen snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPlan {
    pub pass: MigrationPass,
    #[serde(skip)]
    pub batch: WriteBatch,
    pub assignments: Vec<Assignment>,
    /// Records whose `uid` is set to their existing canonical key
    pub backfilled: Vec<String>,
    pub skipped: Vec<Skipped>,
}

impl MigrationPlan {
    pub fn new(pass: MigrationPass) -> Self {
        Self {
            pass,
            batch: WriteBatch::new(),
            assignments: Vec::new(),
            backfilled: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Number of identifiers minted per prefix.
    pub fn demand(&self) -> BTreeMap<String, u64> {
        let mut demand = BTreeMap::new();
        for assignment in &self.assignments {
            *demand.entry(assignment.prefix.clone()).or_insert(0) += 1;
        }
        demand
    }

    pub(crate) fn skip(&mut self, key: &str, reason: SkipReason) {
        self.skipped.push(Skipped {
            key: key.to_string(),
            reason,
        });
    }
}
