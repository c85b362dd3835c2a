//! Shared domain types for dugout.
//!
//! This crate contains the data model used across the workspace: tasks,
//! workflows, their statuses and read-only projections, agent catalog
//! entries, workflow events, configuration, LLM request/response shapes,
//! and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod error;
pub mod event;
pub mod llm;
pub mod task;
pub mod workflow;
