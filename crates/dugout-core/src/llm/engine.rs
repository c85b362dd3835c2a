//! Single-turn prompt engine.
//!
//! Every built-in agent answers an operation with one completion call: a
//! fixed preamble as the system prompt and a formatted prompt as the only
//! user message. `PromptEngine` owns that call and its GenAI span.

use std::sync::Arc;

use tracing::{Instrument, debug, field, info_span};

use dugout_types::config::LlmSettings;
use dugout_types::llm::{CompletionRequest, LlmError, Message};

use super::box_provider::BoxLlmProvider;

/// Request parameters applied to every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

impl From<&LlmSettings> for PromptSettings {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

/// Sends single-turn prompts through a shared provider.
///
/// Cheap to clone; all built-in agents share one provider.
#[derive(Debug, Clone)]
pub struct PromptEngine {
    provider: Arc<BoxLlmProvider>,
    settings: PromptSettings,
}

impl PromptEngine {
    pub fn new(provider: Arc<BoxLlmProvider>, settings: PromptSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &PromptSettings {
        &self.settings
    }

    fn build_request(&self, preamble: &str, prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            system: Some(preamble.to_string()),
            messages: vec![Message::user(prompt)],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Complete `prompt` under `preamble` and return the reply text.
    pub async fn ask(&self, preamble: &str, prompt: String) -> Result<String, LlmError> {
        let request = self.build_request(preamble, prompt);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
        );

        let response = self
            .provider
            .complete(&request)
            .instrument(span.clone())
            .await?;

        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
        debug!(
            model = %response.model,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );

        Ok(response.content)
    }
}
