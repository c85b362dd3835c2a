//! Global configuration types for dugout.
//!
//! `DugoutConfig` represents the top-level `config.toml`: which inference
//! endpoint the agents talk to and how the orchestrator is initialized.

use serde::{Deserialize, Serialize};

use crate::agent::CustomAgentSpec;
use crate::workflow::ExecutionMode;

/// Top-level configuration.
///
/// Loaded from `~/.dugout/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DugoutConfig {
    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub orchestrator: OrchestratorSettings,

    /// Runtime-defined agents registered at startup (`[[custom_agents]]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_agents: Vec<CustomAgentSpec>,
}

/// Inference endpoint settings shared by every built-in agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider label used in logs and spans.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// OpenAI-compatible base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key. The key itself never
    /// lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout for a single completion call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_provider_name() -> String {
    "groq".to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: None,
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Orchestrator initialization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Mode used when the caller does not pick one.
    #[serde(default)]
    pub default_mode: ExecutionMode,

    /// Agent kinds to initialize at startup. Empty means every registered kind.
    #[serde(default)]
    pub agents: Vec<String>,
}
