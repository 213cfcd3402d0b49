pub mod directory;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod models;
pub mod planner;
pub mod store;

pub use directory::directory_state::DirectoryState;
pub use directory::user_directory::UserDirectory;
pub use engine::migration_engine::MigrationEngine;
pub use engine::migration_report::{MigrationReport, PassOutcome, PassSummary};
pub use engine::serial_strategy::SerialStrategy;
pub use error::{CoreError, Result};
pub use identifier::{
    FALLBACK_PREFIX, build_identifier, format_date, is_canonical, is_legacy_key, parse_serial,
    parse_serial_for_prefix, role_prefix,
};
pub use models::migration_pass::MigrationPass;
pub use models::migration_state::MigrationState;
pub use models::new_user::NewUser;
pub use models::user_record::UserRecord;
pub use models::user_update::UserUpdate;
pub use planner::migration_plan::{Assignment, MigrationPlan, SkipReason, Skipped};
pub use planner::serial_allocator::SerialAllocator;
pub use planner::{plan_field_backfill, plan_key_migration, plan_pass};
pub use store::change_notification::ChangeNotification;
pub use store::memory_store::MemoryRecordStore;
pub use store::monotonic_clock::MonotonicClock;
pub use store::record_store::RecordStore;
pub use store::write_batch::{WriteBatch, WriteOp};

pub use error_location::ErrorLocation;

#[cfg(test)]
mod tests;
