use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{build_http_client, read_json_response, TextGenerator};
use crate::{
    error::{PlannerError, Result},
    schemas::SchemaHandle,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Google Gemini `generateContent` client with JSON-mode output.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_body(prompt: &str, schema: &SchemaHandle) -> Value {
        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema.to_gemini_schema()
            }
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, schema: &SchemaHandle) -> Result<String> {
        let client = build_http_client(self.timeout)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = Self::request_body(prompt, schema);

        info!(
            target: "packing::provider",
            model = %self.model,
            schema = schema.schema_name(),
            "Calling Gemini generateContent"
        );

        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| PlannerError::Http(format!("HTTP request failed: {err}")))?;

        let response_json = read_json_response(response).await?;
        extract_text(&response_json)
    }
}

/// Concatenate the text parts of the first candidate, skipping thought parts.
fn extract_text(response: &Value) -> Result<String> {
    let Some(candidate) = response.get("candidates").and_then(|c| c.get(0)) else {
        let reason = response
            .get("promptFeedback")
            .and_then(|feedback| feedback.get("blockReason"))
            .and_then(|value| value.as_str())
            .unwrap_or("no candidates returned");
        warn!(target: "packing::provider", reason, "Gemini returned no candidates");
        return Err(PlannerError::EmptyResponse(reason.to_string()));
    };

    let text: String = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let finish_reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(PlannerError::EmptyResponse(format!(
            "candidate had no text (finish reason: {finish_reason})"
        )));
    }

    debug!(target: "packing::provider", bytes = text.len(), "Gemini response text received");
    Ok(text)
}
