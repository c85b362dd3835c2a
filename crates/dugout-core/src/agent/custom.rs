//! Runtime-defined agents.
//!
//! A custom agent is described entirely by a `CustomAgentSpec` and answers
//! its single `execute(input_data)` operation through the prompt engine,
//! using a preamble built from the spec.

use dugout_types::agent::{AgentProfile, CustomAgentSpec};
use dugout_types::error::AgentError;
use dugout_types::task::TaskArguments;

use super::{Agent, require_str};
use crate::llm::PromptEngine;

pub const EXECUTE: &str = "execute";
pub const INPUT_DATA: &str = "input_data";

const OPERATIONS: &[&str] = &[EXECUTE];

/// Generic agent built from a `CustomAgentSpec`.
#[derive(Debug, Clone)]
pub struct CustomAgent {
    spec: CustomAgentSpec,
    preamble: String,
    engine: PromptEngine,
}

impl CustomAgent {
    pub fn new(spec: CustomAgentSpec, engine: PromptEngine) -> Self {
        let preamble = spec.preamble();
        Self {
            spec,
            preamble,
            engine,
        }
    }

    /// Catalog entry for this agent.
    pub fn profile(spec: &CustomAgentSpec) -> AgentProfile {
        AgentProfile {
            kind: spec.kind.clone(),
            name: spec.name.clone(),
            role: spec.role.clone(),
            description: spec.description.clone(),
            capabilities: spec.capabilities.clone(),
            operations: vec![EXECUTE.to_string()],
            default_operation: EXECUTE.to_string(),
            input_argument: INPUT_DATA.to_string(),
        }
    }
}

impl Agent for CustomAgent {
    fn kind(&self) -> &str {
        &self.spec.kind
    }

    fn operations(&self) -> &'static [&'static str] {
        OPERATIONS
    }

    async fn invoke(&self, operation: &str, arguments: &TaskArguments) -> Result<String, AgentError> {
        if operation != EXECUTE {
            return Err(AgentError::UnknownOperation(operation.to_string()));
        }
        let input = require_str(arguments, INPUT_DATA)?;
        Ok(self.engine.ask(&self.preamble, input.to_string()).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm::box_provider::testing::RecordingProvider;
    use crate::llm::{BoxLlmProvider, PromptSettings};

    fn spec() -> CustomAgentSpec {
        CustomAgentSpec {
            kind: "analyst".to_string(),
            name: "Video Analyst".to_string(),
            role: "performance analyst".to_string(),
            description: "Breaks down match footage".to_string(),
            capabilities: vec!["Shot maps".to_string()],
        }
    }

    fn engine(provider: RecordingProvider) -> PromptEngine {
        PromptEngine::new(
            Arc::new(BoxLlmProvider::new(provider)),
            PromptSettings {
                model: "m".to_string(),
                max_tokens: 64,
                temperature: None,
            },
        )
    }

    #[tokio::test]
    async fn execute_forwards_input_under_spec_preamble() {
        let provider = RecordingProvider::default();
        let requests = provider.requests.clone();
        let agent = CustomAgent::new(spec(), engine(provider));

        let mut args = TaskArguments::new();
        args.insert(INPUT_DATA.to_string(), serde_json::json!("review the powerplay"));
        let out = agent.invoke(EXECUTE, &args).await.unwrap();

        assert_eq!(out, "reply to: review the powerplay");
        let sent = requests.lock().unwrap();
        assert!(sent[0].system.as_deref().unwrap().starts_with("You are Video Analyst"));
    }

    #[tokio::test]
    async fn rejects_other_operations() {
        let agent = CustomAgent::new(spec(), engine(RecordingProvider::default()));
        let err = agent.invoke("plan_strategy", &TaskArguments::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownOperation(_)));
    }

    #[test]
    fn profile_uses_execute_operation() {
        let profile = CustomAgent::profile(&spec());
        assert_eq!(profile.kind, "analyst");
        assert_eq!(profile.operations, vec!["execute"]);
        assert_eq!(profile.input_argument, "input_data");
    }
}
