use crate::{MigrationPass, MigrationPlan, Skipped};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counts for one committed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Operations in the committed batch
    pub writes: usize,
    /// Records that received a newly minted identifier
    pub migrated: usize,
    /// Records whose `uid` was set to their existing key
    pub backfilled: usize,
    pub skipped: Vec<Skipped>,
}

impl From<&MigrationPlan> for PassSummary {
    fn from(plan: &MigrationPlan) -> Self {
        Self {
            writes: plan.batch.len(),
            migrated: plan.assignments.len(),
            backfilled: plan.backfilled.len(),
            skipped: plan.skipped.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    /// Completion marker already set; nothing read or written
    AlreadyCompleted { completed_at: Option<DateTime<Utc>> },
    /// A prerequisite pass has not completed yet
    Blocked { waiting_on: MigrationPass },
    Completed(PassSummary),
}

impl PassOutcome {
    pub fn writes(&self) -> usize {
        match self {
            Self::Completed(summary) => summary.writes,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub key_migration: PassOutcome,
    pub field_backfill: PassOutcome,
}

impl MigrationReport {
    pub fn writes(&self) -> usize {
        self.key_migration.writes() + self.field_backfill.writes()
    }
}
