use crate::{CliError, Result as CliErrorResult};

use uid_core::{build_identifier, parse_serial, role_prefix};

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use serde_json::{Value, json};

#[derive(Subcommand)]
pub enum IdCommands {
    /// Show the two-letter prefix for a role
    Prefix {
        /// Role id (omit for the fallback prefix)
        role: Option<String>,
    },

    /// Build an identifier from its parts
    Build {
        /// Role id
        #[arg(long)]
        role: Option<String>,

        /// Serial number (1 or greater)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        serial: u64,

        /// Creation date: YYYY-MM-DD or RFC 3339 (default: now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Extract the serial from a candidate identifier
    Parse {
        candidate: String,

        /// Role id the candidate should belong to
        #[arg(long)]
        role: Option<String>,
    },
}

impl IdCommands {
    pub fn execute(self) -> CliErrorResult<Value> {
        match self {
            IdCommands::Prefix { role } => Ok(json!({
                "role": role,
                "prefix": role_prefix(role.as_deref()),
            })),
            IdCommands::Build { role, serial, date } => {
                let instant = date.as_deref().map(parse_date).transpose()?;
                Ok(json!({
                    "identifier": build_identifier(role.as_deref(), serial, instant),
                    "prefix": role_prefix(role.as_deref()),
                    "serial": serial,
                }))
            }
            IdCommands::Parse { candidate, role } => {
                let serial = parse_serial(Some(&candidate), role.as_deref());
                Ok(json!({
                    "candidate": candidate,
                    "prefix": role_prefix(role.as_deref()),
                    "canonical": serial.is_some(),
                    "serial": serial,
                }))
            }
        }
    }
}

/// Accepts a calendar date (midnight UTC) or a full RFC 3339 instant.
pub(crate) fn parse_date(input: &str) -> CliErrorResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    DateTime::parse_from_rfc3339(input)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| {
            CliError::invalid_argument(format!(
                "date must be YYYY-MM-DD or RFC 3339, got '{}'",
                input
            ))
        })
}
