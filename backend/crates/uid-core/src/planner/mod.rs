//! Phase one of a migration pass: compute every write against a frozen
//! snapshot. Records are visited in key order so the same snapshot always
//! yields the same serials.

pub mod migration_plan;
pub mod serial_allocator;

use crate::identifier::build_identifier;
use crate::{Assignment, MigrationPass, MigrationPlan, SerialAllocator, SkipReason, UserRecord};

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, warn};

pub fn plan_pass(
    pass: MigrationPass,
    snapshot: &[UserRecord],
    allocator: &mut SerialAllocator,
    now: DateTime<Utc>,
) -> MigrationPlan {
    match pass {
        MigrationPass::KeyMigration => plan_key_migration(snapshot, allocator, now),
        MigrationPass::FieldBackfill => plan_field_backfill(snapshot, allocator, now),
    }
}

/// Re-key every legacy record under a freshly minted canonical identifier.
pub fn plan_key_migration(
    snapshot: &[UserRecord],
    allocator: &mut SerialAllocator,
    now: DateTime<Utc>,
) -> MigrationPlan {
    let mut plan = MigrationPlan::new(MigrationPass::KeyMigration);
    let mut taken: HashSet<String> = snapshot.iter().map(|u| u.id.clone()).collect();

    for record in sorted(snapshot.iter().filter(|u| u.is_legacy())) {
        let Some(role) = record.role() else {
            warn!("Skipping key migration for {}: missing roleId", record.id);
            plan.skip(&record.id, SkipReason::MissingRole);
            continue;
        };

        let prefix = record.prefix();
        let created_at = record.created_at.unwrap_or(now);
        let Some(serial) = allocator.next(&prefix) else {
            warn!("Skipping key migration for {}: no serials left for {}", record.id, prefix);
            plan.skip(&record.id, SkipReason::SerialExhausted { prefix });
            continue;
        };
        let identifier = build_identifier(Some(role), serial, Some(created_at));

        if !taken.insert(identifier.clone()) {
            warn!(
                "Skipping key migration for {}: target key {} already exists",
                record.id, identifier
            );
            plan.skip(&record.id, SkipReason::KeyCollision { target: identifier });
            continue;
        }

        let mut migrated = record.clone();
        migrated.id = identifier.clone();
        migrated.uid = Some(identifier.clone());
        migrated.created_at = Some(created_at);
        migrated.updated_at = Some(now);

        debug!("Planned key migration {} -> {}", record.id, identifier);
        plan.batch.create(migrated).delete(record.id.clone());
        plan.assignments.push(Assignment {
            record_key: record.id.clone(),
            identifier,
            prefix,
            serial,
        });
    }

    plan
}

/// Make every `uid` field agree with a canonical identifier without
/// renaming any key.
pub fn plan_field_backfill(
    snapshot: &[UserRecord],
    allocator: &mut SerialAllocator,
    now: DateTime<Utc>,
) -> MigrationPlan {
    let mut plan = MigrationPlan::new(MigrationPass::FieldBackfill);
    let mut taken: HashSet<String> = snapshot
        .iter()
        .flat_map(|u| [Some(u.id.clone()), u.uid.clone()])
        .flatten()
        .collect();

    for record in sorted(snapshot.iter()) {
        if record.has_canonical_key() {
            if record.uid.as_deref() != Some(record.id.as_str()) {
                debug!("Planned uid backfill for {}", record.id);
                plan.batch.update_uid(&record.id, &record.id, now);
                plan.backfilled.push(record.id.clone());
            }
            continue;
        }

        if record.has_canonical_uid() {
            continue;
        }

        let Some(role) = record.role() else {
            warn!("Skipping uid backfill for {}: missing roleId", record.id);
            plan.skip(&record.id, SkipReason::MissingRole);
            continue;
        };

        let prefix = record.prefix();
        let Some(serial) = allocator.next(&prefix) else {
            warn!("Skipping uid backfill for {}: no serials left for {}", record.id, prefix);
            plan.skip(&record.id, SkipReason::SerialExhausted { prefix });
            continue;
        };
        let created_at = record.created_at.unwrap_or(now);
        let identifier = build_identifier(Some(role), serial, Some(created_at));

        if !taken.insert(identifier.clone()) {
            warn!(
                "Skipping uid backfill for {}: identifier {} already in use",
                record.id, identifier
            );
            plan.skip(&record.id, SkipReason::KeyCollision { target: identifier });
            continue;
        }

        debug!("Planned uid {} for {}", identifier, record.id);
        plan.batch.update_uid(&record.id, &identifier, now);
        plan.assignments.push(Assignment {
            record_key: record.id.clone(),
            identifier,
            prefix,
            serial,
        });
    }

    plan
}

fn sorted<'a>(records: impl Iterator<Item = &'a UserRecord>) -> Vec<&'a UserRecord> {
    let mut records: Vec<&UserRecord> = records.collect();
    records.sort_by(|a, b| a.id.cmp(&b.id));
    records
}
