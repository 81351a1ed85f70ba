//! Error types for Ghost.
//!
//! This module provides the application-level error returned by the CLI.
//! The autopilot core never fails; errors only exist at the edges
//! (configuration, the hosted planner and command handling).

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::modules::planner::PlannerError;

/// Errors that can occur during application execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum GhostError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Planner request failed.
    #[error("Planner error: {0}")]
    PlannerError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// The async runtime could not be started.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for GhostError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for GhostError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<String> for GhostError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for GhostError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

impl From<ConfigError> for GhostError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<PlannerError> for GhostError {
    fn from(err: PlannerError) -> Self { Self::PlannerError(err.to_string()) }
}
