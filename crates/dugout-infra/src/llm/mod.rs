//! LLM provider implementations.

pub mod openai_compat;

use std::time::Duration;

use dugout_core::llm::{BoxLlmProvider, PromptEngine, PromptSettings};
use dugout_types::config::LlmSettings;
use dugout_types::llm::LlmError;
use secrecy::SecretString;
use std::sync::Arc;

use openai_compat::{OpenAiCompatConfig, OpenAiCompatibleProvider};

/// Build the configured provider and wrap it in a shared prompt engine.
pub fn build_prompt_engine(settings: &LlmSettings, api_key: SecretString) -> Result<PromptEngine, LlmError> {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig {
        provider_name: settings.provider_name.clone(),
        base_url: settings.base_url.clone(),
        api_key,
        timeout: Duration::from_secs(settings.request_timeout_secs),
    })?;

    tracing::debug!(
        provider = settings.provider_name.as_str(),
        base_url = settings.base_url.as_str(),
        model = settings.model.as_str(),
        "LLM provider configured"
    );

    Ok(PromptEngine::new(
        Arc::new(BoxLlmProvider::new(provider)),
        PromptSettings::from(settings),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_engine_from_settings() {
        let settings = LlmSettings {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: Some(0.5),
            ..LlmSettings::default()
        };
        let engine = build_prompt_engine(&settings, SecretString::from("test-key-not-real")).unwrap();
        assert_eq!(engine.settings().model, "llama-3.1-8b-instant");
        assert_eq!(engine.settings().temperature, Some(0.5));
    }
}
