//! OpenAiCompatibleProvider -- [`LlmProvider`] for any endpoint speaking the
//! OpenAI chat completions protocol (Groq, OpenAI, local servers).
//!
//! The API key is held as a [`SecretString`] and only exposed when building
//! the `Authorization` header.

pub mod types;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};

use dugout_core::llm::LlmProvider;
use dugout_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use types::{ChatRequest, ChatResponse};

/// Connection settings for an OpenAI-compatible endpoint.
pub struct OpenAiCompatConfig {
    /// Provider label (e.g. "groq").
    pub provider_name: String,
    /// Base URL, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    pub api_key: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Provider posting to `{base_url}/chat/completions`.
///
/// Does not implement `Debug`.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    provider_name: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            provider_name: config.provider_name,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatRequest::from(request);

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after_ms, error_body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(e.to_string()))?;

        Ok(chat.into_completion())
    }
}

/// Map a non-success HTTP status to an [`LlmError`].
fn status_error(status: StatusCode, retry_after_ms: Option<u64>, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        400 | 404 | 413 | 422 => LlmError::InvalidRequest(body),
        502 | 503 | 529 => LlmError::Overloaded(body),
        code => LlmError::Provider {
            message: format!("HTTP {code}: {body}"),
        },
    }
}

/// `Retry-After` in whole seconds, converted to milliseconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| (secs * 1000.0) as u64)
}
