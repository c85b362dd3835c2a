//! Live agent instances.
//!
//! The pool holds at most one live agent per kind. Tasks resolve their agent
//! through it at execution time; a kind missing from the pool makes the task
//! fail with "agent not initialized".

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::BoxAgent;

/// Live agents keyed by kind.
#[derive(Debug, Default, Clone)]
pub struct AgentPool {
    agents: BTreeMap<String, Arc<BoxAgent>>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the live agent for `kind`.
    pub fn insert(&mut self, kind: impl Into<String>, agent: BoxAgent) {
        self.agents.insert(kind.into(), Arc::new(agent));
    }

    pub fn get(&self, kind: &str) -> Option<Arc<BoxAgent>> {
        self.agents.get(kind).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.agents.contains_key(kind)
    }

    /// Live kind keys, sorted.
    pub fn kinds(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Outcome of an `initialize_agents` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// Kinds that now have a live agent.
    pub initialized: Vec<String>,
    /// Requested kinds with no registry entry. These were skipped.
    pub unknown: Vec<String>,
}
