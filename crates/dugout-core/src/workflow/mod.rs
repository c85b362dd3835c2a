//! Workflow execution engine.
//!
//! - `dag`: dependency resolution (runnability, leveling, cycle detection)
//! - `runner`: single-task execution against the live agent pool
//! - `executor`: sequential and level-grouped parallel strategies

pub mod dag;
pub mod executor;
pub mod runner;

pub use executor::{ExecutionReport, run_parallel, run_sequential};
pub use runner::TaskRunner;
