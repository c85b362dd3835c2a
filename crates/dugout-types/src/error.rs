//! Error taxonomy for the workflow engine.
//!
//! Three layers:
//! - `AgentError` -- raised by an agent's own operation (bad arguments, the
//!   remote inference service failed).
//! - `TaskError` -- a per-task fault. Recorded on the task as its error
//!   text; never aborts a run.
//! - `OrchestratorError` -- workflow/engine-level faults surfaced directly
//!   to the caller of a top-level operation.

use thiserror::Error;

use crate::llm::LlmError;
use crate::task::{TaskId, TaskStatus};
use crate::workflow::{ExecutionMode, WorkflowId};

/// Errors raised by an agent operation.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    #[error("argument '{name}' must be {expected}")]
    InvalidArgument { name: String, expected: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// A fault while executing a single task.
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    /// No live agent is registered under the task's agent kind.
    #[error("agent '{0}' not initialized")]
    AgentNotInitialized(String),

    /// The resolved agent does not expose the named operation.
    #[error("agent '{agent_kind}' has no operation '{operation}'")]
    UnknownOperation {
        agent_kind: String,
        operation: String,
    },

    /// The agent call itself failed.
    #[error("{0}")]
    AgentInvocation(AgentError),

    /// Execution was requested for a task that is not Pending.
    #[error("task is {0}, not pending")]
    NotPending(TaskStatus),

    /// The spawned agent call panicked or was aborted.
    #[error("agent call aborted: {0}")]
    Aborted(String),
}

impl From<AgentError> for TaskError {
    fn from(err: AgentError) -> Self {
        TaskError::AgentInvocation(err)
    }
}

/// Errors surfaced by orchestrator operations.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("workflow {0} not found")]
    WorkflowNotFound(WorkflowId),

    #[error("execution mode '{0}' is not supported")]
    UnsupportedMode(ExecutionMode),

    /// The prerequisite graph contains a cycle; nothing was run.
    #[error("cyclic dependency involving task {task_id}")]
    CyclicDependency { task_id: TaskId },

    /// Direct invocation of an agent kind that is not live.
    #[error("agent '{0}' not initialized")]
    AgentNotInitialized(String),

    /// A direct agent invocation failed.
    #[error(transparent)]
    Task(#[from] TaskError),
}
