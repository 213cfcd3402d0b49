pub mod migration_pass;
pub mod migration_state;
pub mod new_user;
pub mod timestamp;
pub mod user_record;
pub mod user_update;

/// Document fields owned by the store and the migration engine.
pub const RESERVED_FIELDS: &[&str] = &["id", "uid", "roleId", "createdAt", "updatedAt"];
