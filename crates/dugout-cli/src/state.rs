//! Application state: configuration plus a ready orchestrator.

use std::path::PathBuf;

use anyhow::Context;
use dugout_core::Orchestrator;
use dugout_core::agent::InitReport;
use dugout_infra::agents::default_registry;
use dugout_infra::config::{load_config, resolve_api_key, resolve_data_dir};
use dugout_infra::llm::build_prompt_engine;
use dugout_types::config::DugoutConfig;

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub config: DugoutConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, build the LLM engine and bring agents up.
    ///
    /// Initializes the kinds listed in `[orchestrator] agents`, or every
    /// built-in kind when the list is empty, then registers the configured
    /// custom agents.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir).await;

        let api_key = resolve_api_key(&config.llm)?;
        let engine = build_prompt_engine(&config.llm, api_key).context("failed to build LLM provider")?;

        let mut orchestrator = Orchestrator::new(default_registry(engine.clone()));
        let report: InitReport = if config.orchestrator.agents.is_empty() {
            orchestrator.initialize_all_agents()
        } else {
            orchestrator.initialize_agents(&config.orchestrator.agents)
        };
        tracing::debug!(
            initialized = report.initialized.len(),
            unknown = report.unknown.len(),
            "agents initialized"
        );

        for spec in &config.custom_agents {
            tracing::debug!(agent_kind = spec.kind.as_str(), "registering custom agent");
            orchestrator.register_custom_agent(spec.clone(), engine.clone());
        }

        Ok(Self {
            orchestrator,
            config,
            data_dir,
        })
    }
}
