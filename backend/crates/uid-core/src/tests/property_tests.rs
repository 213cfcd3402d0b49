use crate::tests::day;
use crate::{
    SerialAllocator, UserRecord, build_identifier, parse_serial, parse_serial_for_prefix,
    plan_key_migration,
};

use std::collections::HashSet;

use chrono::TimeDelta;
use proptest::prelude::*;

const ROLES: &[&str] = &[
    "admin",
    "client",
    "editor",
    "developer",
    "manager",
    "freelancer",
    "designer",
];

proptest! {
    #[test]
    fn given_any_role_serial_and_date_when_built_then_parse_returns_serial(
        role in proptest::option::of("[a-zA-Z0-9_-]{0,12}"),
        serial in 1u64..10_000_000,
        days in 0i64..30_000,
    ) {
        let instant = day(2000, 1, 1) + TimeDelta::days(days);
        let identifier = build_identifier(role.as_deref(), serial, Some(instant));

        prop_assert_eq!(parse_serial(Some(&identifier), role.as_deref()), Some(serial));
    }

    #[test]
    fn given_random_legacy_records_when_planned_then_serials_unique_per_prefix(
        accounts in proptest::collection::vec(
            (0usize..ROLES.len(), "[a-z]{1,8}", 0i64..3_000),
            1..40,
        ),
    ) {
        let snapshot: Vec<UserRecord> = accounts
            .iter()
            .enumerate()
            .map(|(i, (role, name, days))| {
                let mut record = UserRecord::new(format!("{name}{i}@x.com"), Some(ROLES[*role]));
                record.created_at = Some(day(2020, 1, 1) + TimeDelta::days(*days));
                record
            })
            .collect();

        let mut allocator = SerialAllocator::seeded(&snapshot);
        let plan = plan_key_migration(&snapshot, &mut allocator, day(2030, 1, 1));

        prop_assert_eq!(plan.assignments.len(), snapshot.len());
        let mut seen = HashSet::new();
        for assignment in &plan.assignments {
            prop_assert_eq!(
                parse_serial_for_prefix(&assignment.identifier, &assignment.prefix),
                Some(assignment.serial)
            );
            prop_assert!(seen.insert((assignment.prefix.clone(), assignment.serial)));
        }
    }
}
