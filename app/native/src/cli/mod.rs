//! CLI module for Ghost.
//!
//! This module provides the command-line interface: running the autopilot
//! against the in-memory desktop, requesting single plans and inspecting
//! the configuration.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::GhostError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), GhostError> {
    let cli = Cli::parse();
    cli.execute()
}
