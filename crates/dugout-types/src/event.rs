//! Workflow lifecycle events.
//!
//! `WorkflowEvent` is broadcast on the engine's event bus for every task and
//! workflow transition. All variants are Clone + Send + Sync for use with
//! tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::task::TaskId;
use crate::workflow::{ExecutionMode, WorkflowId};

/// Events emitted while a workflow is driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// The engine started driving a workflow.
    WorkflowStarted {
        workflow_id: WorkflowId,
        name: String,
        mode: ExecutionMode,
        task_count: usize,
    },

    /// A task moved to InProgress.
    TaskStarted {
        workflow_id: WorkflowId,
        task_id: TaskId,
        agent_kind: String,
        operation: String,
    },

    /// A task completed.
    TaskCompleted {
        workflow_id: WorkflowId,
        task_id: TaskId,
        duration_ms: u64,
    },

    /// A task failed.
    TaskFailed {
        workflow_id: WorkflowId,
        task_id: TaskId,
        error: String,
    },

    /// A task was left Pending when the engine stopped.
    TaskStalled {
        workflow_id: WorkflowId,
        task_id: TaskId,
    },

    /// The engine stopped driving a workflow.
    WorkflowFinished {
        workflow_id: WorkflowId,
        completed: usize,
        failed: usize,
        stalled: usize,
        duration_ms: u64,
    },
}

impl WorkflowEvent {
    /// The workflow this event belongs to.
    pub fn workflow_id(&self) -> WorkflowId {
        match self {
            WorkflowEvent::WorkflowStarted { workflow_id, .. }
            | WorkflowEvent::TaskStarted { workflow_id, .. }
            | WorkflowEvent::TaskCompleted { workflow_id, .. }
            | WorkflowEvent::TaskFailed { workflow_id, .. }
            | WorkflowEvent::TaskStalled { workflow_id, .. }
            | WorkflowEvent::WorkflowFinished { workflow_id, .. } => *workflow_id,
        }
    }

    /// The task this event belongs to, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            WorkflowEvent::TaskStarted { task_id, .. }
            | WorkflowEvent::TaskCompleted { task_id, .. }
            | WorkflowEvent::TaskFailed { task_id, .. }
            | WorkflowEvent::TaskStalled { task_id, .. } => Some(*task_id),
            WorkflowEvent::WorkflowStarted { .. } | WorkflowEvent::WorkflowFinished { .. } => None,
        }
    }
}
