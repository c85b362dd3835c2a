//! LLM provider abstractions.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `PromptEngine`: single-turn completion with a fixed preamble, used by
//!   every built-in agent

pub mod box_provider;
pub mod engine;
pub mod provider;

pub use box_provider::BoxLlmProvider;
pub use engine::{PromptEngine, PromptSettings};
pub use provider::LlmProvider;
