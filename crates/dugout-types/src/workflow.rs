//! Workflow domain types.
//!
//! A `Workflow` exclusively owns an ordered list of tasks plus an execution
//! mode. Insertion order of tasks is preserved; it breaks ties in sequential
//! execution but never affects correctness.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{Task, TaskId, TaskStatus, TaskView};

/// Identifier of a workflow. UUIDv7, so ordering by id is creation order.
pub type WorkflowId = Uuid;

// ---------------------------------------------------------------------------
// Execution mode
// ---------------------------------------------------------------------------

/// How the engine drives a workflow's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One task at a time, in dependency order.
    #[default]
    Sequential,
    /// Level-grouped batches, all tasks of a level run concurrently.
    Parallel,
    /// Declared but has no strategy.
    Conditional,
    /// Declared but has no strategy.
    Pipeline,
}

impl ExecutionMode {
    /// Whether the engine has a strategy for this mode.
    pub fn is_implemented(self) -> bool {
        matches!(self, ExecutionMode::Sequential | ExecutionMode::Parallel)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Conditional => "conditional",
            ExecutionMode::Pipeline => "pipeline",
        };
        f.write_str(s)
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(ExecutionMode::Sequential),
            "parallel" => Ok(ExecutionMode::Parallel),
            "conditional" => Ok(ExecutionMode::Conditional),
            "pipeline" => Ok(ExecutionMode::Pipeline),
            other => Err(format!("unknown execution mode: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow status
// ---------------------------------------------------------------------------

/// Aggregate status of a workflow.
///
/// A workflow reaches Completed once the engine stops driving it, even when
/// some member tasks failed or were left Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    InProgress,
    Completed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A named DAG of tasks plus an execution strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mode: ExecutionMode,
    pub created_at: DateTime<Utc>,
    tasks: Vec<Task>,
    status: WorkflowStatus,
    results: BTreeMap<TaskId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl Workflow {
    /// Create an empty Pending workflow.
    pub fn new(name: impl Into<String>, mode: ExecutionMode) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            mode,
            created_at: Utc::now(),
            tasks: Vec::new(),
            status: WorkflowStatus::Pending,
            results: BTreeMap::new(),
            completed_at: None,
        }
    }

    /// Set the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a task, returning its id.
    pub fn push_task(&mut self, task: Task) -> TaskId {
        let id = task.id;
        self.tasks.push(task);
        id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Results of completed tasks, keyed by task id.
    pub fn results(&self) -> &BTreeMap<TaskId, String> {
        &self.results
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Ids of tasks currently in status Completed.
    pub fn completed_ids(&self) -> HashSet<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.status() == TaskStatus::Completed)
            .map(|t| t.id)
            .collect()
    }

    /// Number of tasks in the given status.
    pub fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status() == status).count()
    }

    /// Mark the workflow as being driven by the engine.
    pub fn begin(&mut self) {
        self.status = WorkflowStatus::InProgress;
    }

    /// Record a completed task's result.
    pub fn record_result(&mut self, task_id: TaskId, result: impl Into<String>) {
        self.results.insert(task_id, result.into());
    }

    /// Mark the workflow as no longer driven by the engine.
    pub fn finish(&mut self) {
        self.status = WorkflowStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Full read-only projection.
    pub fn view(&self) -> WorkflowView {
        WorkflowView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            mode: self.mode,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            tasks: self.tasks.iter().map(Task::view).collect(),
            results: self.results.clone(),
        }
    }

    /// Short listing projection.
    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            id: self.id,
            name: self.name.clone(),
            mode: self.mode,
            status: self.status,
            task_count: self.tasks.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Serializable workflow projection with every task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowView {
    pub id: WorkflowId,
    pub name: String,
    pub description: Option<String>,
    pub mode: ExecutionMode,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tasks: Vec<TaskView>,
    pub results: BTreeMap<TaskId, String>,
}

/// One row of a workflow listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    pub mode: ExecutionMode,
    pub status: WorkflowStatus,
    pub task_count: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskArguments;

    fn task(kind: &str, op: &str, deps: Vec<TaskId>) -> Task {
        Task::new(kind, op, TaskArguments::new(), deps)
    }

    #[test]
    fn new_workflow_is_pending_and_empty() {
        let wf = Workflow::new("Team Preparation", ExecutionMode::Sequential);
        assert_eq!(wf.status(), WorkflowStatus::Pending);
        assert!(wf.tasks().is_empty());
        assert!(wf.results().is_empty());
        assert!(wf.completed_at().is_none());
    }

    #[test]
    fn tasks_keep_insertion_order() {
        let mut wf = Workflow::new("order", ExecutionMode::Parallel);
        let a = wf.push_task(task("head_coach", "plan_strategy", vec![]));
        let b = wf.push_task(task("batting_coach", "train_batting", vec![a]));
        let c = wf.push_task(task("player", "report_performance", vec![b]));
        let ids: Vec<TaskId> = wf.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(wf.task(b).unwrap().prerequisites, vec![a]);
    }

    #[test]
    fn lifecycle_begin_finish() {
        let mut wf = Workflow::new("life", ExecutionMode::Sequential);
        wf.begin();
        assert_eq!(wf.status(), WorkflowStatus::InProgress);
        wf.finish();
        assert_eq!(wf.status(), WorkflowStatus::Completed);
        assert!(wf.completed_at().is_some());
    }

    #[test]
    fn completed_ids_tracks_task_status() {
        let mut wf = Workflow::new("ids", ExecutionMode::Sequential);
        let a = wf.push_task(task("head_coach", "plan_strategy", vec![]));
        let b = wf.push_task(task("player", "report_performance", vec![]));
        wf.task_mut(a).unwrap().complete("ok");
        wf.task_mut(b).unwrap().fail("boom");
        let done = wf.completed_ids();
        assert!(done.contains(&a));
        assert!(!done.contains(&b));
        assert_eq!(wf.count_status(TaskStatus::Failed), 1);
    }

    #[test]
    fn execution_mode_parse_and_display() {
        for mode in [
            ExecutionMode::Sequential,
            ExecutionMode::Parallel,
            ExecutionMode::Conditional,
            ExecutionMode::Pipeline,
        ] {
            let parsed: ExecutionMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert_eq!("PARALLEL".parse::<ExecutionMode>(), Ok(ExecutionMode::Parallel));
        assert!("round_robin".parse::<ExecutionMode>().is_err());
    }

    #[test]
    fn only_sequential_and_parallel_are_implemented() {
        assert!(ExecutionMode::Sequential.is_implemented());
        assert!(ExecutionMode::Parallel.is_implemented());
        assert!(!ExecutionMode::Conditional.is_implemented());
        assert!(!ExecutionMode::Pipeline.is_implemented());
    }

    #[test]
    fn view_and_summary_shapes() {
        let mut wf = Workflow::new("shape", ExecutionMode::Parallel).with_description("nets session");
        let a = wf.push_task(task("head_coach", "plan_strategy", vec![]));
        wf.record_result(a, "plan");

        let summary = wf.summary();
        assert_eq!(summary.task_count, 1);
        assert_eq!(summary.mode, ExecutionMode::Parallel);

        let value = serde_json::to_value(wf.view()).unwrap();
        for key in [
            "id",
            "name",
            "description",
            "mode",
            "status",
            "created_at",
            "completed_at",
            "tasks",
            "results",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["mode"], "parallel");
        assert_eq!(value["results"][a.to_string()], "plan");
    }

    #[test]
    fn view_is_stable_without_mutation() {
        let mut wf = Workflow::new("stable", ExecutionMode::Sequential);
        wf.push_task(task("head_coach", "plan_strategy", vec![]));
        assert_eq!(wf.view(), wf.view());
        assert_eq!(wf.summary(), wf.summary());
    }
}
