//! Built-in agents and the default registry.

pub mod cricket;

use dugout_core::agent::{AgentRegistry, BoxAgent};
use dugout_core::llm::PromptEngine;

pub use cricket::{CricketAgent, CricketOperation, CricketRole};

/// Registry with every cricket role, all sharing `engine`.
pub fn default_registry(engine: PromptEngine) -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    for role in CricketRole::ALL {
        let engine = engine.clone();
        registry.register(role.profile(), move || {
            BoxAgent::new(CricketAgent::new(role, engine.clone()))
        });
    }
    registry
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use dugout_core::llm::{BoxLlmProvider, LlmProvider, PromptEngine, PromptSettings};
    use dugout_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

    /// Provider that answers with the prompt it was sent.
    pub struct PromptEcho;

    impl LlmProvider for PromptEcho {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let content = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(CompletionResponse {
                id: "echo-1".to_string(),
                content,
                model: request.model.clone(),
                usage: Usage::default(),
            })
        }
    }

    pub fn echo_engine() -> PromptEngine {
        PromptEngine::new(
            Arc::new(BoxLlmProvider::new(PromptEcho)),
            PromptSettings {
                model: "llama-3.3-70b-versatile".to_string(),
                max_tokens: 1024,
                temperature: None,
            },
        )
    }
}
