//! Action planners.
//!
//! A [`Planner`] turns a description of the desktop into a list of
//! [`CursorAction`]s. The autopilot treats planners as opaque producers:
//! failures are reported as [`PlannerError`] and recovered by the caller.
//!
//! - [`GeminiPlanner`] asks a hosted generative model over HTTP.
//! - [`LocalPlanner`] improvises plausible plans offline.
//! - [`FilePlanner`] replays a fixed plan from disk.

mod action;
mod file;
mod gemini;
mod local;
mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
pub use action::{ActionKind, ActionPlan, CursorAction};
pub use file::FilePlanner;
pub use gemini::GeminiPlanner;
pub use local::LocalPlanner;
pub use prompt::{build_prompt, response_schema};
use serde::Serialize;

use crate::config::{PlannerConfig, PlannerProvider};
use crate::modules::desktop::Viewport;
use crate::utils::random::RandomSource;

/// Errors a planner can report.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// No API key was found in the configured environment variables.
    #[error("Planner API key not set (looked in {0})")]
    MissingApiKey(String),

    /// The request could not be sent or the response could not be read.
    #[error("Planner transport failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Planner returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response did not contain a usable action list.
    #[error("Planner response was not a valid plan: {0}")]
    InvalidResponse(String),

    /// The response contained no candidate text at all.
    #[error("Planner response was empty")]
    EmptyResponse,

    /// A plan file could not be read.
    #[error("Failed to read plan file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self { Self::Transport(err.to_string()) }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self { Self::InvalidResponse(err.to_string()) }
}

/// What the planner is told about the desktop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Titles of the windows that are currently open.
    pub open_windows: Vec<String>,
    /// Viewport dimensions.
    pub viewport: Viewport,
}

/// Producer of action plans.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Requests the next batch of actions.
    ///
    /// # Errors
    ///
    /// Returns a [`PlannerError`] if no usable plan could be produced.
    async fn request_plan(&self, request: &PlanRequest) -> Result<Vec<CursorAction>, PlannerError>;
}

/// Builds the planner selected by `config`.
///
/// Falls back to the [`LocalPlanner`] when the hosted provider is selected
/// but no API key is available, or when `offline` is set.
#[must_use]
pub fn from_config(
    config: &PlannerConfig,
    offline: bool,
    rng: Arc<RandomSource>,
) -> Arc<dyn Planner> {
    if offline || config.provider == PlannerProvider::Local {
        return Arc::new(LocalPlanner::new(rng, config.min_actions, config.max_actions));
    }

    match GeminiPlanner::from_config(config) {
        Ok(planner) => Arc::new(planner),
        Err(err) => {
            tracing::warn!(error = %err, "ghost: hosted planner unavailable, planning locally");
            Arc::new(LocalPlanner::new(rng, config.min_actions, config.max_actions))
        }
    }
}
