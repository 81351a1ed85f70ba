//! Hosted planner backed by the Gemini `generateContent` REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::prompt::{build_prompt, response_schema};
use super::{ActionPlan, CursorAction, PlanRequest, Planner, PlannerError};
use crate::config::PlannerConfig;

/// Maximum number of response body bytes echoed into an error.
const MAX_ERROR_BODY: usize = 512;

/// Planner that asks a hosted Gemini model for a JSON action list.
pub struct GeminiPlanner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    min_actions: usize,
    max_actions: usize,
}

impl GeminiPlanner {
    /// Creates a planner from configuration.
    ///
    /// The API key is read from the first variable in `api_key_env` that is
    /// set and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::MissingApiKey`] if no key is set, or
    /// [`PlannerError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let api_key = config
            .api_key_env
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|value| !value.trim().is_empty()))
            .ok_or_else(|| PlannerError::MissingApiKey(config.api_key_env.join(", ")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            min_actions: config.min_actions,
            max_actions: config.max_actions,
        })
    }

    fn url(&self) -> String { format!("{}/models/{}:generateContent", self.endpoint, self.model) }
}

#[async_trait]
impl Planner for GeminiPlanner {
    fn name(&self) -> &'static str { "gemini" }

    async fn request_plan(&self, request: &PlanRequest) -> Result<Vec<CursorAction>, PlannerError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": build_prompt(request, self.min_actions, self.max_actions) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        tracing::debug!(model = %self.model, windows = request.open_windows.len(), "ghost: requesting plan");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(PlannerError::Status { code: status.as_u16(), body });
        }

        let response: GenerateContentResponse = response.json().await?;
        parse_plan(&response)
    }
}

// ============================================================================
// Response parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extracts the action list from the first candidate's text parts.
fn parse_plan(response: &GenerateContentResponse) -> Result<Vec<CursorAction>, PlannerError> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PlannerError::EmptyResponse);
    }

    let plan: ActionPlan = serde_json::from_str(&text)?;
    Ok(plan.actions)
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
