pub mod migration_engine;
pub mod migration_report;
pub mod serial_strategy;
