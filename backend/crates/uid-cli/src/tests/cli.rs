use crate::Cli;
use crate::commands::Commands;
use crate::id_commands::IdCommands;
use crate::user_commands::UserCommands;

use clap::Parser;
use googletest::prelude::*;
use serde_json::json;

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_they_apply() {
    // When
    let cli = Cli::try_parse_from(["uidctl", "status", "--pretty", "--config-dir", "/tmp/uid"])
        .unwrap();

    // Then
    assert_that!(cli.pretty, eq(true));
    assert_that!(
        cli.config_dir.as_deref(),
        some(eq(std::path::Path::new("/tmp/uid")))
    );
    assert!(matches!(cli.command, Commands::Status));
}

#[test]
fn given_reset_without_pass_or_all_when_parsed_then_fails() {
    let result = Cli::try_parse_from(["uidctl", "reset"]);

    assert!(result.is_err());
}

#[test]
fn given_reset_with_both_pass_and_all_when_parsed_then_fails() {
    let result = Cli::try_parse_from(["uidctl", "reset", "--pass", "key_migration", "--all"]);

    assert!(result.is_err());
}

#[test]
fn given_unknown_strategy_when_parsed_then_fails() {
    let result = Cli::try_parse_from(["uidctl", "migrate", "--strategy", "random"]);

    assert!(result.is_err());
}

#[test]
fn given_zero_serial_when_parsed_then_fails() {
    let result = Cli::try_parse_from(["uidctl", "id", "build", "--role", "admin", "--serial", "0"]);

    assert!(result.is_err());
}

#[test]
fn given_repeated_fields_when_parsing_create_then_all_are_collected() {
    // When
    let cli = Cli::try_parse_from([
        "uidctl",
        "user",
        "create",
        "--email",
        "jane@x.com",
        "--role",
        "client",
        "--field",
        "displayName=Jane",
        "--field",
        "age=31",
    ])
    .unwrap();

    // Then
    match cli.command {
        Commands::User {
            action: UserCommands::Create { fields, .. },
        } => {
            assert_eq!(
                fields,
                vec![
                    ("displayName".to_string(), json!("Jane")),
                    ("age".to_string(), json!(31)),
                ]
            );
        }
        _ => panic!("expected user create"),
    }
}

#[test]
fn given_id_parse_when_parsed_then_candidate_is_positional() {
    let cli =
        Cli::try_parse_from(["uidctl", "id", "parse", "ad7050324", "--role", "admin"]).unwrap();

    match cli.command {
        Commands::Id {
            action: IdCommands::Parse { candidate, role },
        } => {
            assert_that!(candidate, eq("ad7050324"));
            assert_that!(role.as_deref(), some(eq("admin")));
        }
        _ => panic!("expected id parse"),
    }
}
