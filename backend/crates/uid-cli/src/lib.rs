//! uid-cli library
//!
//! Command definitions and the application layer behind the `uidctl` binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod id_commands;
pub mod logger;
pub mod user_commands;

#[cfg(test)]
mod tests;

pub use app::{App, render};
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result};
