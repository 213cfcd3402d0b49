mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod migration_config;

pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use migration_config::MigrationConfig;

pub const CONFIG_DIR_ENV: &str = "UID_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".uid";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_DATABASE_FILENAME: &str = "uid.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_SERIAL_STRATEGY: &str = "scan";
const DEFAULT_AUTO_MIGRATE: bool = true;

const SERIAL_STRATEGIES: [&str; 2] = ["scan", "counter"];

#[cfg(test)]
mod tests;
