use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

/// One turn of a chat conversation
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Client for an OpenRouter-compatible chat-completions API
pub struct LlmClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| LlmError::InvalidConfig("API key is not a valid header value".into()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        log::info!("LLM client initialized with model: {}", config.model);

        Ok(Self {
            client,
            endpoint,
            model: config.model,
        })
    }

    /// Configured chat model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request and return the assistant's text.
    ///
    /// Failures propagate; there is no retry policy at this layer.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        log::debug!(
            "Chat request to {} ({} messages, temperature {temperature})",
            self.endpoint,
            messages.len()
        );

        let resp = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;
    use std::time::Duration;

    fn config(key: &str) -> LlmConfig {
        LlmConfig {
            api_key: key.to_string(),
            model: "test/model".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = LlmClient::new(LlmConfig {
            base_url: "https://openrouter.ai/api/v1/".to_string(),
            ..config("sk-test")
        })
        .unwrap();
        assert_eq!(client.endpoint, "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn newline_in_api_key_is_rejected() {
        assert!(LlmClient::new(config("bad\nkey")).is_err());
    }

    #[test]
    fn response_parsing_takes_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let raw = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "");
    }
}
