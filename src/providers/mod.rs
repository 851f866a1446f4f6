//! Generative text backends.
//!
//! The planner only needs one capability from a provider: turn a prompt plus an
//! output schema into the model's text answer. Anything that satisfies
//! [`TextGenerator`] can stand in for the real services, which is how the tests
//! drive the session without network access.

pub mod gemini;
pub mod openai_compatible;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{PlannerError, Result},
    schemas::SchemaHandle,
};

pub use gemini::GeminiClient;
pub use openai_compatible::OpenAiCompatibleClient;

#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Ask the model for a JSON answer conforming to `schema` and return its raw text.
    async fn generate(&self, prompt: &str, schema: &SchemaHandle) -> Result<String>;
}

pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| PlannerError::Http(format!("Failed to build HTTP client: {err}")))
}

/// Read the body and turn non-success statuses into [`PlannerError::Provider`].
pub(crate) async fn read_json_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|err| PlannerError::Http(format!("Failed to read response: {err}")))?;

    if !status.is_success() {
        let api_message = serde_json::from_str::<Value>(&response_text)
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or(response_text);

        return Err(PlannerError::Provider {
            status: status.as_u16(),
            message: api_message,
        });
    }

    serde_json::from_str(&response_text)
        .map_err(|err| PlannerError::Http(format!("Failed to parse provider JSON: {err}")))
}
