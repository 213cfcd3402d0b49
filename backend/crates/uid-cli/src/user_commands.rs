use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Refresh the directory (migrating if enabled) and list every user
    List {
        /// Only users with this role id
        #[arg(long)]
        role: Option<String>,
    },

    /// Get a user by key
    Get {
        /// Storage key (canonical identifier or legacy email)
        key: String,
    },

    /// Create a user under a new canonical identifier
    Create {
        #[arg(long)]
        email: String,

        /// Role id, e.g. admin, client, editor
        #[arg(long)]
        role: String,

        /// Extra document field as name=value (value parsed as JSON when possible)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Update a user's role or fields
    Update {
        key: String,

        /// New role id
        #[arg(long)]
        role: Option<String>,

        /// Field to set as name=value
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,

        /// Field to remove
        #[arg(long = "unset")]
        unset: Vec<String>,
    },

    /// Delete a user
    Delete { key: String },
}

/// Parse `name=value`. Values that are valid JSON keep their type; anything
/// else is taken as a plain string.
pub fn parse_field(input: &str) -> Result<(String, Value), String> {
    let (name, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", input))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name is empty in '{}'", input));
    }

    let value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
