use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use crate::{
    error::{PlannerError, Result},
    providers::{gemini, openai_compatible, GeminiClient, OpenAiCompatibleClient, TextGenerator},
};

pub const DEFAULT_STORE_PATH: &str = "packing-list.json";

/// Which backend generates the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn api_key_var(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => gemini::DEFAULT_MODEL,
            Provider::OpenAi => openai_compatible::DEFAULT_MODEL,
        }
    }
}

impl FromStr for Provider {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" | "openrouter" => Ok(Provider::OpenAi),
            other => Err(PlannerError::Config(format!(
                "unknown provider `{other}` (expected gemini or openai)"
            ))),
        }
    }
}

/// Runtime settings, read from the environment and overridable from the CLI.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub store_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            api_key: None,
            model: None,
            base_url: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            timeout: None,
        }
    }
}

impl PlannerConfig {
    /// Read `PACKING_*` variables plus the provider's API key variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("PACKING_PROVIDER") {
            Some(value) => value.parse()?,
            None => Provider::default(),
        };

        let timeout = match lookup("PACKING_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(value.trim().parse().map_err(|_| {
                PlannerError::Config(format!("PACKING_TIMEOUT_SECS must be whole seconds, got `{value}`"))
            })?)),
            None => None,
        };

        Ok(Self {
            provider,
            api_key: lookup(provider.api_key_var()).filter(|key| !key.trim().is_empty()),
            model: lookup("PACKING_MODEL"),
            base_url: lookup("PACKING_BASE_URL"),
            store_path: lookup("PACKING_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Build the configured provider client.
    pub fn build_generator(&self) -> Result<Arc<dyn TextGenerator>> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            PlannerError::Config(format!(
                "{} must be set (or pass --api-key)",
                self.provider.api_key_var()
            ))
        })?;

        let generator: Arc<dyn TextGenerator> = match self.provider {
            Provider::Gemini => {
                let mut client = GeminiClient::new(api_key)
                    .with_model(self.model())
                    .with_timeout(self.timeout);
                if let Some(base_url) = &self.base_url {
                    client = client.with_base_url(base_url.clone());
                }
                Arc::new(client)
            }
            Provider::OpenAi => {
                let mut client = OpenAiCompatibleClient::new(api_key)
                    .with_model(self.model())
                    .with_timeout(self.timeout);
                if let Some(base_url) = &self.base_url {
                    client = client.with_base_url(base_url.clone());
                }
                Arc::new(client)
            }
        };
        Ok(generator)
    }
}
