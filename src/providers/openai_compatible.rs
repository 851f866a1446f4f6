use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use super::{build_http_client, read_json_response, TextGenerator};
use crate::{
    error::{PlannerError, Result},
    schemas::SchemaHandle,
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";

/// Chat-completions client for OpenAI-compatible endpoints (OpenAI, OpenRouter).
#[derive(Clone, Debug)]
pub struct OpenAiCompatibleClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiCompatibleClient {
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
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn generate(&self, prompt: &str, schema: &SchemaHandle) -> Result<String> {
        let client = build_http_client(self.timeout)?;
        let request_url = build_chat_url(&self.base_url);
        let body = ChatCompletionRequest::new(
            self.model.clone(),
            vec![json!({ "role": "user", "content": prompt })],
        )
        .with_response_schema(schema)
        .into_value();

        info!(
            target: "packing::provider",
            model = %self.model,
            schema = schema.schema_name(),
            "Calling chat completions"
        );

        let response = client
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "packing-planner-rs")
            .json(&body)
            .send()
            .await
            .map_err(|err| PlannerError::Http(format!("HTTP request failed: {err}")))?;

        let response_json = read_json_response(response).await?;
        extract_content(&response_json)
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

fn extract_content(response: &Value) -> Result<String> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .unwrap_or_else(|| error.to_string());
        return Err(PlannerError::Provider {
            status: 200,
            message,
        });
    }

    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .map(|content| content.to_string())
        .ok_or_else(|| PlannerError::EmptyResponse("no message content in first choice".to_string()))
}

#[derive(Clone, Debug)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            response_format: None,
        }
    }

    fn with_response_schema(mut self, schema: &SchemaHandle) -> Self {
        self.response_format = Some(json!({
            "type": "json_schema",
            "json_schema": {
                "name": schema.schema_name(),
                "strict": true,
                "schema": schema.to_strict_json_schema()
            }
        }));
        self
    }

    fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
