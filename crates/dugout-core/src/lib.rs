//! Workflow execution engine for dugout.
//!
//! This crate defines the agent capability interface (the "port" that
//! concrete agents in dugout-infra implement), the dependency resolver, the
//! sequential and level-grouped parallel executors, and the `Orchestrator`
//! that owns workflows and live agents. It depends only on `dugout-types` --
//! never on `dugout-infra` or any network crate.

pub mod agent;
pub mod event;
pub mod llm;
pub mod orchestrator;
pub mod workflow;

pub use orchestrator::Orchestrator;
