//! uidctl - canonical user identifier CLI
//!
//! Results are printed to stdout as JSON; logs go to stderr or the configured
//! log file.
//!
//! # Examples
//!
//! ```bash
//! # Preview the migration without writing anything
//! uidctl migrate --dry-run --pretty
//!
//! # Create an account
//! uidctl user create --email jane@x.com --role client --field displayName=Jane
//!
//! # Inspect an identifier
//! uidctl id parse ad7050324 --role admin
//! ```

use uid_cli::{App, Cli, Commands, Result as CliErrorResult, logger, render};
use uid_config::Config;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match run(cli).await.and_then(|value| render(&value, pretty)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliErrorResult<serde_json::Value> {
    // Pure identifier tools skip config, logging and the database
    let command = match cli.command {
        Commands::Id { action } => return action.execute(),
        command => command,
    };

    let config = match &cli.config_dir {
        Some(dir) => Config::load_from(dir)?,
        None => Config::load()?,
    };
    config.validate()?;

    let colored = config.logging.colored && std::io::stderr().is_terminal();
    logger::initialize(config.logging.level, config.log_file_path(), colored)?;
    config.log_summary();

    let app = App::open(config, cli.pretty).await?;
    app.execute(command).await
}
