use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AUTO_MIGRATE, DEFAULT_SERIAL_STRATEGY,
    SERIAL_STRATEGIES,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// `scan` (max + 1 over a snapshot) or `counter` (transactional reservation)
    pub serial_strategy: String,
    /// Run pending passes whenever the directory refreshes
    pub auto_migrate: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            serial_strategy: String::from(DEFAULT_SERIAL_STRATEGY),
            auto_migrate: DEFAULT_AUTO_MIGRATE,
        }
    }
}

impl MigrationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let strategy = self.serial_strategy.trim().to_lowercase();
        if !SERIAL_STRATEGIES.contains(&strategy.as_str()) {
            return Err(ConfigError::migration(format!(
                "migration.serial_strategy must be one of {:?}, got '{}'",
                SERIAL_STRATEGIES, self.serial_strategy
            )));
        }
        Ok(())
    }
}
