//! Remote text generation over an OpenAI-style chat-completions API.
//!
//! The wire shape is the external contract: a JSON `messages` array goes
//! in, `choices[0].message.content` comes out. The client carries a
//! request timeout so a hung call can never stall the tracking loop's
//! detached announce tasks indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::GenerationError;
use crate::storage::GenerationConfig;

/// Default chat-completions endpoint (Groq's OpenAI-compatible API).
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Pluggable text-generation capability.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    async fn generate(&self, system_role: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Chat-completions client backed by reqwest.
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl GroqClient {
    /// Build a client from configuration. The API key is resolved by the
    /// host (see [`crate::storage::Config::resolve_api_key`]).
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(
        cfg: &GenerationConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        Self::with_endpoint(
            &cfg.endpoint,
            api_key,
            &cfg.model,
            cfg.temperature,
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        })
    }
}

#[async_trait]
impl TextGenerationClient for GroqClient {
    async fn generate(&self, system_role: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system_role },
                { "role": "user", "content": prompt },
            ],
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GenerationError::Http {
                status: status.as_u16(),
            });
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let content = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                GenerationError::Parse("missing choices[0].message.content".to_string())
            })?;

        let text = content.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> GroqClient {
        GroqClient::with_endpoint(
            format!("{}/v1/chat/completions", server.url()),
            "test-key",
            "test-model",
            0.9,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn returns_trimmed_message_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  Keep going!  "}}]}"#,
            )
            .create_async()
            .await;

        let text = client(&server).generate("role", "prompt").await.unwrap();
        assert_eq!(text, "Keep going!");
    }

    #[tokio::test]
    async fn non_2xx_maps_to_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let err = client(&server).generate("role", "prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let err = client(&server).generate("role", "prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_choices_maps_to_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server).generate("role", "prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[tokio::test]
    async fn blank_content_maps_to_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let err = client(&server).generate("role", "prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }
}
