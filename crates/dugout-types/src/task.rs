//! Task domain types.
//!
//! A `Task` is one scheduled invocation of one agent operation inside a
//! workflow. Status transitions go through the methods on `Task` so that a
//! terminal state (Completed, Failed, Cancelled) is reached at most once and
//! `completed_at` is stamped exactly once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a task. UUIDv7, stable for the task's lifetime.
pub type TaskId = Uuid;

/// Named arguments passed verbatim to an agent operation.
pub type TaskArguments = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    /// Reserved. Nothing in the engine transitions a task into this state.
    Cancelled,
}

impl TaskStatus {
    /// Whether this status is final for the run.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A single unit of work: invoke `operation` on the agent registered under
/// `agent_kind` with `arguments`, once every prerequisite has completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Registry key of the agent handling this task.
    pub agent_kind: String,
    /// Operation name on that agent.
    pub operation: String,
    pub arguments: TaskArguments,
    /// Tasks (same workflow) that must reach Completed first. Not validated
    /// at creation time; an id that never completes blocks this task.
    pub prerequisites: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a Pending task. Duplicate prerequisite ids are collapsed,
    /// keeping first-seen order.
    pub fn new(
        agent_kind: impl Into<String>,
        operation: impl Into<String>,
        arguments: TaskArguments,
        prerequisites: impl IntoIterator<Item = TaskId>,
    ) -> Self {
        let mut deps: Vec<TaskId> = Vec::new();
        for dep in prerequisites {
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        Self {
            id: Uuid::now_v7(),
            agent_kind: agent_kind.into(),
            operation: operation.into(),
            arguments,
            prerequisites: deps,
            created_at: Utc::now(),
            status: TaskStatus::Pending,
            result: None,
            error: None,
            completed_at: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Pending -> InProgress. Returns false if the task was not Pending.
    pub fn mark_in_progress(&mut self) -> bool {
        if self.status != TaskStatus::Pending {
            return false;
        }
        self.status = TaskStatus::InProgress;
        true
    }

    /// Transition to Completed with `result`.
    ///
    /// Returns false (and changes nothing) if the task is already terminal.
    pub fn complete(&mut self, result: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.result = Some(result.into());
        self.completed_at = Some(Utc::now());
        true
    }

    /// Transition to Failed with a human-readable cause.
    ///
    /// Returns false (and changes nothing) if the task is already terminal.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        true
    }

    /// Read-only projection for an API layer.
    pub fn view(&self) -> TaskView {
        TaskView {
            id: self.id,
            agent_kind: self.agent_kind.clone(),
            operation: self.operation.clone(),
            status: self.status,
            result: self.result.clone(),
            error: self.error.clone(),
            created_at: self.created_at,
            completed_at: self.completed_at,
            prerequisites: self.prerequisites.clone(),
        }
    }
}

/// Serializable task projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: TaskId,
    pub agent_kind: String,
    pub operation: String,
    pub status: TaskStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub prerequisites: Vec<TaskId>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
