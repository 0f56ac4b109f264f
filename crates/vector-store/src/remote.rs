use crate::error::{Result, VectorStoreError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embeddings client for OpenAI-compatible endpoints.
///
/// The API accepts one input per request in our usage, so callers loop for
/// batches; there is deliberately no retry logic here.
#[derive(Clone)]
pub(crate) struct RemoteEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl RemoteEmbedder {
    pub(crate) fn new(
        api_key: &str,
        base_url: &str,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| {
                VectorStoreError::EmbeddingError("API key is not a valid header value".to_string())
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    pub(crate) async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let resp = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(VectorStoreError::EmbeddingError(format!(
                "Embeddings request failed ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = resp.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| {
                VectorStoreError::EmbeddingError("Embeddings response had no data".to_string())
            })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let embedder = RemoteEmbedder::new(
            "sk-test",
            "https://openrouter.ai/api/v1/",
            "openai/text-embedding-3-large".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(embedder.endpoint, "https://openrouter.ai/api/v1/embeddings");
    }

    #[test]
    fn response_parsing_extracts_vector() {
        let raw = r#"{"data":[{"index":0,"embedding":[0.25,-0.5]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.25, -0.5]);
    }
}
