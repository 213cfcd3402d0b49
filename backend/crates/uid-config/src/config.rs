use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR_NAME,
    DatabaseConfig, LoggingConfig, MigrationConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub migration: MigrationConfig,
    /// Directory the config was loaded from; relative paths resolve against it
    #[serde(skip)]
    pub dir: PathBuf,
}

impl Config {
    /// Load config from the default location.
    ///
    /// Loading order:
    /// 1. Check for UID_CONFIG_DIR env var, else use ./.uid/
    /// 2. Continue as `load_from`
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        Self::load_from(&Self::config_dir()?)
    }

    /// Load config from an explicit directory.
    ///
    /// Creates the directory if missing, reads config.toml if it exists
    /// (defaults otherwise), then applies UID_* environment overrides.
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.to_path_buf(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.dir = config_dir.to_path_buf();
        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: UID_CONFIG_DIR env var > ./.uid/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.database.validate()?;
        self.logging.validate()?;
        self.migration.validate()?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.dir.join(&self.database.path)
    }

    /// Log file location, if file logging is enabled.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .as_ref()
            .map(|file| self.dir.join(&self.logging.dir).join(file))
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded from {}:", self.dir.display());
        info!("  database: {}", self.database_path().display());
        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("none")
        );
        info!(
            "  migration: strategy={}, auto_migrate={}",
            self.migration.serial_strategy, self.migration.auto_migrate
        );
    }

    fn apply_env_overrides(&mut self) {
        // Database
        Self::apply_env_string("UID_DATABASE_PATH", &mut self.database.path);

        // Logging
        Self::apply_env_parse("UID_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("UID_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("UID_LOG_FILE", &mut self.logging.file);

        // Migration
        Self::apply_env_string("UID_SERIAL_STRATEGY", &mut self.migration.serial_strategy);
        Self::apply_env_bool("UID_AUTO_MIGRATE", &mut self.migration.auto_migrate);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
