//! Infrastructure implementations for dugout.
//!
//! Concrete adapters behind the ports defined in dugout-core: the
//! OpenAI-compatible LLM provider, the five cricket agents and their
//! registry, the config loader, and the team-preparation workflow builder.

pub mod agents;
pub mod config;
pub mod llm;
pub mod workflows;
