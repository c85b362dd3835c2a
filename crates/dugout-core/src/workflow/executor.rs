//! Workflow execution strategies.
//!
//! - `run_sequential`: repeated rounds over the task list in workflow order,
//!   one agent call at a time, until a round runs nothing.
//! - `run_parallel`: tasks grouped by dependency level; each level's runnable
//!   tasks are spawned on a `JoinSet` and joined before the next level starts.
//!
//! Both strategies catch per-task faults, so a failure never aborts the run.
//! Tasks whose prerequisites never complete are left Pending and reported as
//! stalled.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use serde::Serialize;
use tokio::task::JoinSet;

use dugout_types::error::TaskError;
use dugout_types::event::WorkflowEvent;
use dugout_types::task::TaskId;
use dugout_types::workflow::Workflow;

use super::dag;
use super::runner::{InvocationOutcome, TaskRunner, elapsed_ms};

/// Summary of one execution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Results of the tasks completed during this pass.
    pub results: BTreeMap<TaskId, String>,
    /// Ids completed during this pass, in completion order.
    pub completed: Vec<TaskId>,
    /// Ids that failed during this pass.
    pub failed: Vec<TaskId>,
    /// Ids still Pending when the pass stopped.
    pub stalled: Vec<TaskId>,
    pub elapsed_ms: u64,
}

impl ExecutionReport {
    /// True when every task the pass looked at completed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.stalled.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Run bookkeeping
// ---------------------------------------------------------------------------

/// Per-pass state owned by the driving control flow.
struct RunState {
    completed: HashSet<TaskId>,
    report: ExecutionReport,
    started: Instant,
}

impl RunState {
    fn begin(workflow: &mut Workflow, runner: &TaskRunner<'_>) -> Self {
        workflow.begin();
        runner.events().publish(WorkflowEvent::WorkflowStarted {
            workflow_id: workflow.id,
            name: workflow.name.clone(),
            mode: workflow.mode,
            task_count: workflow.tasks().len(),
        });
        tracing::info!(
            workflow_id = %workflow.id,
            workflow = workflow.name.as_str(),
            mode = %workflow.mode,
            tasks = workflow.tasks().len(),
            "starting workflow execution"
        );

        Self {
            // Tasks completed by an earlier pass still satisfy prerequisites.
            completed: workflow.completed_ids(),
            report: ExecutionReport::default(),
            started: Instant::now(),
        }
    }

    fn record(&mut self, workflow: &mut Workflow, task_id: TaskId, outcome: Result<String, TaskError>) {
        match outcome {
            Ok(result) => {
                self.completed.insert(task_id);
                workflow.record_result(task_id, result.clone());
                self.report.results.insert(task_id, result);
                self.report.completed.push(task_id);
            }
            Err(err) => {
                tracing::debug!(
                    task_id = %task_id,
                    error = %err,
                    "continuing past failed task"
                );
                self.report.failed.push(task_id);
            }
        }
    }

    fn end(mut self, workflow: &mut Workflow, runner: &TaskRunner<'_>) -> ExecutionReport {
        for task in workflow.tasks().iter().filter(|t| t.is_pending()) {
            let blocked_on = dag::unmet_prerequisites(task, &self.completed);
            tracing::warn!(
                workflow_id = %workflow.id,
                task_id = %task.id,
                blocked_on = ?blocked_on,
                "task left pending: prerequisites never completed"
            );
            runner.events().publish(WorkflowEvent::TaskStalled {
                workflow_id: workflow.id,
                task_id: task.id,
            });
            self.report.stalled.push(task.id);
        }

        workflow.finish();
        self.report.elapsed_ms = elapsed_ms(self.started);

        runner.events().publish(WorkflowEvent::WorkflowFinished {
            workflow_id: workflow.id,
            completed: self.report.completed.len(),
            failed: self.report.failed.len(),
            stalled: self.report.stalled.len(),
            duration_ms: self.report.elapsed_ms,
        });
        tracing::info!(
            workflow_id = %workflow.id,
            completed = self.report.completed.len(),
            failed = self.report.failed.len(),
            stalled = self.report.stalled.len(),
            duration_ms = self.report.elapsed_ms,
            "workflow execution finished"
        );

        self.report
    }
}

// ---------------------------------------------------------------------------
// Sequential strategy
// ---------------------------------------------------------------------------

/// Run `workflow` one task at a time in dependency order.
///
/// Each round walks the task list in workflow order and executes every
/// Pending task whose prerequisites are all completed, including ones
/// unblocked earlier in the same round. The pass stops after a round that
/// executes nothing.
pub async fn run_sequential(workflow: &mut Workflow, runner: &TaskRunner<'_>) -> ExecutionReport {
    let mut run = RunState::begin(workflow, runner);

    let mut round = 0usize;
    loop {
        let mut executed = 0usize;

        for idx in 0..workflow.tasks().len() {
            let task = &workflow.tasks()[idx];
            if !task.is_pending() || !dag::is_runnable(task, &run.completed) {
                continue;
            }
            let task_id = task.id;

            let outcome = runner.execute(&mut workflow.tasks_mut()[idx]).await;
            run.record(workflow, task_id, outcome);
            executed += 1;
        }

        tracing::debug!(
            workflow_id = %workflow.id,
            round,
            executed,
            "sequential round finished"
        );
        if executed == 0 {
            break;
        }
        round += 1;
    }

    run.end(workflow, runner)
}

// ---------------------------------------------------------------------------
// Parallel (level-grouped) strategy
// ---------------------------------------------------------------------------

/// Run `workflow` level by level, fanning out each level's runnable tasks.
///
/// Levels are computed once up front. Level advancement is unconditional;
/// a task whose prerequisite failed is skipped at its own level and stays
/// Pending. No task in a level starts before every task in lower levels has
/// reached a terminal state.
pub async fn run_parallel(workflow: &mut Workflow, runner: &TaskRunner<'_>) -> ExecutionReport {
    let mut run = RunState::begin(workflow, runner);

    let levels: Vec<(usize, Vec<TaskId>)> = dag::group_by_level(workflow.tasks())
        .into_iter()
        .map(|(level, tasks)| (level, tasks.into_iter().map(|t| t.id).collect()))
        .collect();

    for (level, ids) in levels {
        let mut join_set = JoinSet::new();
        let mut spawned: HashMap<tokio::task::Id, TaskId> = HashMap::new();

        for task_id in ids {
            let Some(task) = workflow.task_mut(task_id) else {
                continue;
            };
            if !task.is_pending() {
                continue;
            }
            if !dag::is_runnable(task, &run.completed) {
                tracing::debug!(
                    task_id = %task_id,
                    level,
                    "skipping blocked task"
                );
                continue;
            }

            match runner.prepare(task) {
                Ok(invocation) => {
                    let handle = join_set.spawn(invocation.call());
                    spawned.insert(handle.id(), task_id);
                }
                Err(err) => run.record(workflow, task_id, Err(err)),
            }
        }

        tracing::debug!(
            workflow_id = %workflow.id,
            level,
            tasks = spawned.len(),
            "processing level"
        );

        while let Some(joined) = join_set.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, outcome)) => outcome,
                Err(join_err) => {
                    let Some(&task_id) = spawned.get(&join_err.id()) else {
                        continue;
                    };
                    InvocationOutcome::aborted(task_id, &join_err)
                }
            };

            let task_id = outcome.task_id;
            let Some(task) = workflow.task_mut(task_id) else {
                continue;
            };
            let result = runner.finish(task, outcome);
            run.record(workflow, task_id, result);
        }
    }

    run.end(workflow, runner)
}
