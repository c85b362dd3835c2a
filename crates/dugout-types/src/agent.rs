//! Agent catalog types.
//!
//! Agents themselves are behavior (see `dugout_core::agent`); these are the
//! plain data describing them for listings and for runtime-defined agents.

use serde::{Deserialize, Serialize};

/// Display catalog entry for an agent kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Registry key (e.g. "head_coach").
    pub kind: String,
    /// Human-readable name (e.g. "Head Coach").
    pub name: String,
    pub role: String,
    pub description: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Operations this kind exposes.
    pub operations: Vec<String>,
    /// Operation used for direct single-agent invocation.
    pub default_operation: String,
    /// Argument name the direct-invocation input is bound to.
    pub input_argument: String,
}

/// Definition of a user-created agent.
///
/// Custom agents expose a single `execute(input_data)` operation and build
/// their preamble from these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAgentSpec {
    /// Registry key under which the agent is registered.
    pub kind: String,
    pub name: String,
    pub role: String,
    pub description: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl CustomAgentSpec {
    /// System preamble describing the agent to the model.
    pub fn preamble(&self) -> String {
        let capabilities = self
            .capabilities
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "You are {}, a {}.\n\nDescription: {}\n\nYour capabilities include:\n{}\n\nRespond to user queries based on your role and capabilities.",
            self.name, self.role, self.description, capabilities
        )
    }
}
