//! Agent kind registry.
//!
//! Maps an agent-kind key to a catalog profile and a constructor. The
//! orchestrator consults it when initializing agents; initialization builds
//! one live instance per requested kind.

use std::collections::BTreeMap;
use std::sync::Arc;

use dugout_types::agent::AgentProfile;

use super::BoxAgent;

/// Builds a fresh agent instance.
pub type AgentConstructor = Arc<dyn Fn() -> BoxAgent + Send + Sync>;

struct RegistryEntry {
    profile: AgentProfile,
    constructor: AgentConstructor,
}

/// Registry of constructible agent kinds, indexed by kind key.
#[derive(Default)]
pub struct AgentRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind under `profile.kind`.
    ///
    /// If the kind is already registered, it is replaced.
    pub fn register<F>(&mut self, profile: AgentProfile, constructor: F)
    where
        F: Fn() -> BoxAgent + Send + Sync + 'static,
    {
        self.entries.insert(
            profile.kind.clone(),
            RegistryEntry {
                profile,
                constructor: Arc::new(constructor),
            },
        );
    }

    /// Constructor registered for `kind`.
    pub fn lookup(&self, kind: &str) -> Option<AgentConstructor> {
        self.entries.get(kind).map(|entry| Arc::clone(&entry.constructor))
    }

    /// Build a new agent of `kind`, or `None` if the kind is unknown.
    pub fn construct(&self, kind: &str) -> Option<BoxAgent> {
        self.entries.get(kind).map(|entry| (entry.constructor)())
    }

    pub fn profile(&self, kind: &str) -> Option<&AgentProfile> {
        self.entries.get(kind).map(|entry| &entry.profile)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Registered kind keys, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Catalog profiles of every registered kind, sorted by kind.
    pub fn profiles(&self) -> Vec<&AgentProfile> {
        self.entries.values().map(|entry| &entry.profile).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
