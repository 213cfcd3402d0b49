//! Runs the two one-time migration passes against a record store.

use crate::planner::plan_pass;
use crate::{
    CoreError, MigrationPass, MigrationPlan, MigrationReport, PassOutcome, PassSummary, RecordStore,
    Result as CoreErrorResult, SerialAllocator, SerialStrategy, UserRecord,
};

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationEngine {
    strategy: SerialStrategy,
}

impl MigrationEngine {
    pub fn new(strategy: SerialStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> SerialStrategy {
        self.strategy
    }

    /// Run key migration, then uid backfill.
    ///
    /// A failed key migration commit stops the run before backfill is
    /// evaluated; its completion marker stays unset so the next run retries.
    pub async fn run<S>(&self, store: &S) -> CoreErrorResult<MigrationReport>
    where
        S: RecordStore + ?Sized,
    {
        let key_migration = self.run_pass(store, MigrationPass::KeyMigration).await?;
        let field_backfill = self.run_pass(store, MigrationPass::FieldBackfill).await?;

        Ok(MigrationReport {
            key_migration,
            field_backfill,
        })
    }

    pub async fn run_pass<S>(&self, store: &S, pass: MigrationPass) -> CoreErrorResult<PassOutcome>
    where
        S: RecordStore + ?Sized,
    {
        let state = store.migration_state(pass).await?;
        if state.completed {
            debug!("Migration pass {} already completed", pass);
            return Ok(PassOutcome::AlreadyCompleted {
                completed_at: state.completed_at,
            });
        }

        if pass == MigrationPass::FieldBackfill
            && !store
                .migration_state(MigrationPass::KeyMigration)
                .await?
                .completed
        {
            return Ok(PassOutcome::Blocked {
                waiting_on: MigrationPass::KeyMigration,
            });
        }

        let snapshot = store.list_users().await?;
        let now = store.server_timestamp().await?;
        let plan = self.plan(store, pass, &snapshot, now).await?;
        let summary = PassSummary::from(&plan);

        if !plan.is_empty()
            && let Err(e) = store.commit(plan.batch).await
        {
            error!("Migration pass {} failed to commit: {}", pass, e);
            return Err(e);
        }
        store.mark_migration_completed(pass, now).await?;

        info!(
            "Migration pass {} completed: {} writes, {} migrated, {} backfilled, {} skipped",
            pass,
            summary.writes,
            summary.migrated,
            summary.backfilled,
            summary.skipped.len()
        );

        Ok(PassOutcome::Completed(summary))
    }

    /// Compute a pass against `snapshot` without touching any store.
    pub fn preview(
        &self,
        pass: MigrationPass,
        snapshot: &[UserRecord],
        now: DateTime<Utc>,
    ) -> MigrationPlan {
        plan_pass(pass, snapshot, &mut SerialAllocator::seeded(snapshot), now)
    }

    /// Next serial for a single new record under `prefix`.
    pub async fn allocate_serial<S>(
        &self,
        store: &S,
        snapshot: &[UserRecord],
        prefix: &str,
    ) -> CoreErrorResult<u64>
    where
        S: RecordStore + ?Sized,
    {
        let mut allocator = SerialAllocator::seeded(snapshot);
        match self.strategy {
            SerialStrategy::Scan => allocator
                .next(prefix)
                .ok_or_else(|| CoreError::serial_exhausted(prefix)),
            SerialStrategy::Counter => {
                store
                    .reserve_serials(prefix, allocator.highest(prefix), 1)
                    .await
            }
        }
    }

    async fn plan<S>(
        &self,
        store: &S,
        pass: MigrationPass,
        snapshot: &[UserRecord],
        now: DateTime<Utc>,
    ) -> CoreErrorResult<MigrationPlan>
    where
        S: RecordStore + ?Sized,
    {
        let mut allocator = SerialAllocator::seeded(snapshot);

        if self.strategy == SerialStrategy::Counter {
            // The draft's draws per prefix, collisions included, size each
            // block. The final plan never mints past its block.
            let mut draft = allocator.clone();
            plan_pass(pass, snapshot, &mut draft, now);
            let mut demand: Vec<(String, u64)> = draft
                .draws()
                .iter()
                .map(|(prefix, count)| (prefix.clone(), *count))
                .collect();
            demand.sort();

            for (prefix, count) in demand {
                let floor = allocator.highest(&prefix);
                match store.reserve_serials(&prefix, floor, count).await {
                    Ok(first) => {
                        debug!(
                            "Reserved serials {}..={} for prefix {}",
                            first,
                            first + (count - 1),
                            prefix
                        );
                        allocator.resume_at(&prefix, first, count);
                    }
                    Err(CoreError::SerialExhausted { .. }) => {
                        warn!("No serials left to reserve for prefix {}", prefix);
                        allocator.exhaust(&prefix);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(plan_pass(pass, snapshot, &mut allocator, now))
    }
}
