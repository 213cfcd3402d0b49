pub mod migration_state_repository;
pub mod serial_counter_repository;
pub mod user_repository;
