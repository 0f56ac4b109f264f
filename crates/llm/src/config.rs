use crate::error::{LlmError, Result};
use std::env;
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// LLM client configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key for the OpenRouter-compatible endpoint
    pub api_key: String,

    /// Chat model identifier
    pub model: String,

    /// API base URL (`…/chat/completions` is appended)
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl LlmConfig {
    /// Resolve configuration from the environment.
    ///
    /// `OPENROUTER_API_KEY` is required; `OPENROUTER_MODEL` and
    /// `OPENROUTER_BASE_URL` have defaults. A missing key is fatal at
    /// startup rather than at first request.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::MissingConfig("OPENROUTER_API_KEY environment variable not set".into())
            })?;

        let model = env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(120),
        })
    }
}
