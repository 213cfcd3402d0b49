use crate::tests::{EnvGuard, clear_overrides, setup_config_dir};
use crate::{CONFIG_DIR_ENV, Config};

use googletest::assert_that;
use googletest::prelude::{anything, eq, none, ok, some};
use log::LevelFilter;
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _env = clear_overrides();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.database.path.as_str(), eq(crate::DEFAULT_DATABASE_FILENAME));
    assert_that!(*config.logging.level, eq(crate::DEFAULT_LOG_LEVEL));
    assert_that!(config.migration.serial_strategy.as_str(), eq("scan"));
    assert_that!(config.migration.auto_migrate, eq(true));
    assert_that!(config.dir, eq(&temp.path().to_path_buf()));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _env = clear_overrides();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_directory_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().join("nested").join(".uid");
    let _guard = EnvGuard::set(CONFIG_DIR_ENV, dir.to_str().unwrap());
    let _env = clear_overrides();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    assert!(dir.is_dir());
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_ok_and_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _env = clear_overrides();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
              [database]
              path = "data/users.db"

              [logging]
              level = "debug"
              colored = false
              file = "uid.log"

              [migration]
              serial_strategy = "counter"
              auto_migrate = false
          "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path.as_str(), eq("data/users.db"));
    assert_that!(*config.logging.level, eq(LevelFilter::Debug));
    assert_that!(config.logging.colored, eq(false));
    assert_that!(config.migration.serial_strategy.as_str(), eq("counter"));
    assert_that!(config.migration.auto_migrate, eq(false));
    assert_that!(
        config.database_path(),
        eq(&temp.path().join("data/users.db"))
    );
    assert_that!(
        config.log_file_path(),
        some(eq(&temp.path().join("log").join("uid.log")))
    );
}

#[test]
#[serial]
fn given_partial_toml_when_load_then_missing_sections_use_defaults() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _env = clear_overrides();
    std::fs::write(
        temp.path().join("config.toml"),
        "[migration]\nserial_strategy = \"counter\"",
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.migration.auto_migrate, eq(true));
    assert_that!(config.logging.file, none());
    assert_that!(config.log_file_path(), none());
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _env = clear_overrides();
    std::fs::write(
        temp.path().join("config.toml"),
        "[migration]\nserial_strategy = \"scan\"",
    )
    .unwrap();
    let _strategy = EnvGuard::set("UID_SERIAL_STRATEGY", "counter");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.migration.serial_strategy.as_str(), eq("counter"));
}

#[test]
#[serial]
fn given_multiple_env_overrides_when_load_then_all_apply() {
    // Given
    let _temp = setup_config_dir();
    let _env = clear_overrides();
    let _path = EnvGuard::set("UID_DATABASE_PATH", "other.db");
    let _level = EnvGuard::set("UID_LOG_LEVEL", "warn");
    let _colored = EnvGuard::set("UID_LOG_COLORED", "false");
    let _file = EnvGuard::set("UID_LOG_FILE", "run.log");
    let _auto = EnvGuard::set("UID_AUTO_MIGRATE", "0");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path.as_str(), eq("other.db"));
    assert_that!(*config.logging.level, eq(LevelFilter::Warn));
    assert_that!(config.logging.colored, eq(false));
    assert_that!(config.logging.file.as_deref(), some(eq("run.log")));
    assert_that!(config.migration.auto_migrate, eq(false));
}

#[test]
#[serial]
fn given_explicit_dir_when_load_from_then_env_dir_is_ignored() {
    // Given
    let (_env_dir, _guard) = setup_config_dir();
    let _env = clear_overrides();
    let explicit = tempfile::TempDir::new().unwrap();
    std::fs::write(
        explicit.path().join("config.toml"),
        "[database]\npath = \"explicit.db\"",
    )
    .unwrap();

    // When
    let config = Config::load_from(explicit.path()).unwrap();

    // Then
    assert_that!(
        config.database_path(),
        eq(&explicit.path().join("explicit.db"))
    );
}

// =========================================================================
// Error Tests
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_fails_with_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _env = clear_overrides();
    std::fs::write(temp.path().join("config.toml"), "[database\npath = ").unwrap();

    // When
    let result = Config::load();

    // Then
    assert!(matches!(result, Err(crate::ConfigError::Toml { .. })));
}

#[test]
#[serial]
fn given_wrong_type_in_toml_when_load_then_fails_with_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _env = clear_overrides();
    std::fs::write(
        temp.path().join("config.toml"),
        "[migration]\nauto_migrate = \"sometimes\"",
    )
    .unwrap();

    // When
    let result = Config::load();

    // Then
    assert!(matches!(result, Err(crate::ConfigError::Toml { .. })));
}
