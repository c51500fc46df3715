//! Completion transport: the [`CompletionProvider`] seam and its
//! OpenAI-compatible HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AdvisorConfig;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from a single completion attempt.
///
/// These never reach API callers; [`Advisor`](crate::Advisor) logs them and
/// substitutes a fallback.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// No API key is configured.
    #[error("Completion provider is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Completion API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered without any message content.
    #[error("Completion response had no content")]
    EmptyResponse,

    /// The message content was not valid JSON.
    #[error("Completion content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON did not have the required shape.
    #[error("Completion content has an unexpected shape: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Something that turns a system + user prompt into a JSON-object string.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request one completion. Implementations must not retry.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible provider
// ---------------------------------------------------------------------------

/// Chat-completions client for an OpenAI-compatible API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: AdvisorConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Build a provider with its own HTTP client.
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AdvisorError::NotConfigured)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AdvisorError::EmptyResponse)
    }
}
