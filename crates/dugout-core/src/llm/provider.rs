//! LlmProvider trait definition.

use dugout_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for remote inference backends.
///
/// Implementations live in dugout-infra (e.g. `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Provider label (e.g. "groq").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
