use crate::{id_commands::IdCommands, user_commands::UserCommands};

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run pending migration passes
    Migrate {
        /// Run against an in-memory copy and report what would change
        #[arg(long)]
        dry_run: bool,

        /// Override the configured serial strategy
        #[arg(long, value_parser = ["scan", "counter"])]
        strategy: Option<String>,
    },

    /// Show migration state, serial counters and record counts
    Status,

    /// Clear a pass completion marker so the pass runs again
    Reset {
        /// Pass to reset
        #[arg(
            long,
            value_parser = ["key_migration", "field_backfill"],
            required_unless_present = "all"
        )]
        pass: Option<String>,

        /// Reset both passes
        #[arg(long, conflicts_with = "pass")]
        all: bool,
    },

    /// Keep the directory live, printing each published state as a JSON line
    Watch {
        /// Seconds between re-reads of the database
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },

    /// Identifier tools (no database access)
    Id {
        #[command(subcommand)]
        action: IdCommands,
    },

    /// User operations
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}
