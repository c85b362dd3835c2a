//! Single-task execution.
//!
//! Split into three phases so the parallel executor can run the middle one
//! on a `JoinSet` without holding a borrow of the workflow:
//!
//! 1. `TaskRunner::prepare` -- Pending -> InProgress, resolve agent and
//!    operation against the live pool.
//! 2. `Invocation::call` -- the owned, `'static` agent call.
//! 3. `TaskRunner::finish` -- write the result or error back to the task.
//!
//! Every transition is logged and published on the event bus.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinError;
use tracing::{Instrument, info_span};

use dugout_types::error::{AgentError, TaskError};
use dugout_types::event::WorkflowEvent;
use dugout_types::task::{Task, TaskArguments, TaskId};
use dugout_types::workflow::WorkflowId;

use crate::agent::{AgentPool, BoxAgent};
use crate::event::bus::EventBus;

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A resolved agent call, detached from the task it came from.
pub struct Invocation {
    task_id: TaskId,
    agent_kind: String,
    operation: String,
    agent: Arc<BoxAgent>,
    arguments: TaskArguments,
    started: Instant,
}

/// Result of an `Invocation`, carried back to `TaskRunner::finish`.
#[derive(Debug)]
pub struct InvocationOutcome {
    pub task_id: TaskId,
    pub result: Result<String, TaskError>,
    pub elapsed_ms: u64,
}

impl Invocation {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Run the agent operation.
    pub async fn call(self) -> InvocationOutcome {
        let span = info_span!(
            "dugout.invoke_agent",
            dugout.task.id = %self.task_id,
            dugout.agent.kind = %self.agent_kind,
            dugout.agent.operation = %self.operation,
        );

        let result = self
            .agent
            .invoke(&self.operation, &self.arguments)
            .instrument(span)
            .await
            .map_err(|err| match err {
                AgentError::UnknownOperation(operation) => TaskError::UnknownOperation {
                    agent_kind: self.agent_kind.clone(),
                    operation,
                },
                other => TaskError::AgentInvocation(other),
            });

        InvocationOutcome {
            task_id: self.task_id,
            result,
            elapsed_ms: elapsed_ms(self.started),
        }
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("task_id", &self.task_id)
            .field("agent_kind", &self.agent_kind)
            .field("operation", &self.operation)
            .finish()
    }
}

impl InvocationOutcome {
    /// Outcome for a call whose task panicked or was cancelled before
    /// producing a result.
    pub(crate) fn aborted(task_id: TaskId, join_err: &JoinError) -> Self {
        let reason = if join_err.is_panic() { "panicked" } else { "cancelled" };
        Self {
            task_id,
            result: Err(TaskError::Aborted(reason.to_string())),
            elapsed_ms: 0,
        }
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// TaskRunner
// ---------------------------------------------------------------------------

/// Executes tasks of one workflow against the live agent pool.
#[derive(Debug, Clone, Copy)]
pub struct TaskRunner<'a> {
    pool: &'a AgentPool,
    events: &'a EventBus,
    workflow_id: WorkflowId,
}

impl<'a> TaskRunner<'a> {
    pub fn new(pool: &'a AgentPool, events: &'a EventBus, workflow_id: WorkflowId) -> Self {
        Self {
            pool,
            events,
            workflow_id,
        }
    }

    pub fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    pub fn events(&self) -> &EventBus {
        self.events
    }

    /// Move `task` to InProgress and resolve its agent and operation.
    ///
    /// Resolution faults mark the task Failed before returning. A task that
    /// is not Pending is left untouched.
    pub fn prepare(&self, task: &mut Task) -> Result<Invocation, TaskError> {
        if !task.mark_in_progress() {
            return Err(TaskError::NotPending(task.status()));
        }

        self.events.publish(WorkflowEvent::TaskStarted {
            workflow_id: self.workflow_id,
            task_id: task.id,
            agent_kind: task.agent_kind.clone(),
            operation: task.operation.clone(),
        });
        tracing::info!(
            workflow_id = %self.workflow_id,
            task_id = %task.id,
            agent_kind = task.agent_kind.as_str(),
            operation = task.operation.as_str(),
            "task started"
        );

        let resolved = match self.pool.get(&task.agent_kind) {
            None => Err(TaskError::AgentNotInitialized(task.agent_kind.clone())),
            Some(agent) if !agent.supports(&task.operation) => Err(TaskError::UnknownOperation {
                agent_kind: task.agent_kind.clone(),
                operation: task.operation.clone(),
            }),
            Some(agent) => Ok(agent),
        };

        match resolved {
            Ok(agent) => Ok(Invocation {
                task_id: task.id,
                agent_kind: task.agent_kind.clone(),
                operation: task.operation.clone(),
                agent,
                arguments: task.arguments.clone(),
                started: Instant::now(),
            }),
            Err(err) => {
                self.record_failure(task, &err);
                Err(err)
            }
        }
    }

    /// Write an invocation outcome back to `task`.
    ///
    /// Returns the result text, or the fault so the strategy layer can log it.
    pub fn finish(&self, task: &mut Task, outcome: InvocationOutcome) -> Result<String, TaskError> {
        match outcome.result {
            Ok(result) => {
                task.complete(result.clone());
                self.events.publish(WorkflowEvent::TaskCompleted {
                    workflow_id: self.workflow_id,
                    task_id: task.id,
                    duration_ms: outcome.elapsed_ms,
                });
                tracing::info!(
                    workflow_id = %self.workflow_id,
                    task_id = %task.id,
                    duration_ms = outcome.elapsed_ms,
                    "task completed"
                );
                Ok(result)
            }
            Err(err) => {
                self.record_failure(task, &err);
                Err(err)
            }
        }
    }

    /// Prepare, call and finish `task` in one step.
    ///
    /// The call runs on its own tokio task, so a panicking agent fails
    /// this task instead of unwinding through the caller.
    pub async fn execute(&self, task: &mut Task) -> Result<String, TaskError> {
        let invocation = self.prepare(task)?;
        let task_id = invocation.task_id();
        let outcome = match tokio::spawn(invocation.call()).await {
            Ok(outcome) => outcome,
            Err(join_err) => InvocationOutcome::aborted(task_id, &join_err),
        };
        self.finish(task, outcome)
    }

    fn record_failure(&self, task: &mut Task, err: &TaskError) {
        let error = err.to_string();
        task.fail(error.clone());
        tracing::warn!(
            workflow_id = %self.workflow_id,
            task_id = %task.id,
            agent_kind = task.agent_kind.as_str(),
            error = error.as_str(),
            "task failed"
        );
        self.events.publish(WorkflowEvent::TaskFailed {
            workflow_id: self.workflow_id,
            task_id: task.id,
            error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{ScriptedAgent, input};
    use dugout_types::task::TaskStatus;
    use uuid::Uuid;

    fn pool_with(agent: ScriptedAgent) -> AgentPool {
        let mut pool = AgentPool::new();
        let kind = agent.kind.clone();
        pool.insert(kind, BoxAgent::new(agent));
        pool
    }

    fn task(kind: &str, operation: &str, value: &str) -> Task {
        Task::new(kind, operation, input(value), [])
    }

    #[tokio::test]
    async fn execute_success_completes_task() {
        let pool = pool_with(ScriptedAgent::new("head_coach"));
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = task("head_coach", "run", "final vs Australia");
        let result = runner.execute(&mut t).await.unwrap();

        assert_eq!(result, "head_coach:final vs Australia");
        assert_eq!(t.status(), TaskStatus::Completed);
        assert_eq!(t.result(), Some(result.as_str()));
        assert!(t.error().is_none());
        assert!(t.completed_at().is_some());

        assert!(matches!(rx.recv().await.unwrap(), WorkflowEvent::TaskStarted { .. }));
        assert!(matches!(rx.recv().await.unwrap(), WorkflowEvent::TaskCompleted { .. }));
    }

    #[tokio::test]
    async fn missing_agent_fails_task() {
        let pool = AgentPool::new();
        let bus = EventBus::new(16);
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = task("head_coach", "run", "x");
        let err = runner.execute(&mut t).await.unwrap_err();

        assert!(matches!(err, TaskError::AgentNotInitialized(ref kind) if kind == "head_coach"));
        assert_eq!(t.status(), TaskStatus::Failed);
        assert_eq!(t.error(), Some("agent 'head_coach' not initialized"));
        assert!(t.completed_at().is_some());
    }

    #[tokio::test]
    async fn unknown_operation_fails_before_invoking() {
        let agent = ScriptedAgent::new("player");
        let calls = agent.calls.clone();
        let pool = pool_with(agent);
        let bus = EventBus::new(16);
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = task("player", "bowl_bouncer", "x");
        let err = runner.execute(&mut t).await.unwrap_err();

        assert!(matches!(err, TaskError::UnknownOperation { .. }));
        assert_eq!(t.status(), TaskStatus::Failed);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn agent_fault_is_recorded_on_task() {
        let pool = pool_with(ScriptedAgent::new("head_physio").failing_on("hamstring", "503 from upstream"));
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = task("head_physio", "run", "hamstring");
        let err = runner.execute(&mut t).await.unwrap_err();

        assert!(matches!(err, TaskError::AgentInvocation(_)));
        assert_eq!(t.status(), TaskStatus::Failed);
        assert!(t.error().unwrap().contains("503 from upstream"));
        assert!(t.result().is_none());

        let _started = rx.recv().await.unwrap();
        match rx.recv().await.unwrap() {
            WorkflowEvent::TaskFailed { task_id, error, .. } => {
                assert_eq!(task_id, t.id);
                assert!(error.contains("503"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_argument_is_an_invocation_fault() {
        let pool = pool_with(ScriptedAgent::new("player"));
        let bus = EventBus::new(16);
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = Task::new("player", "run", TaskArguments::new(), []);
        let err = runner.execute(&mut t).await.unwrap_err();
        assert_eq!(err.to_string(), "missing argument 'input'");
        assert_eq!(t.error(), Some("missing argument 'input'"));
    }

    #[tokio::test]
    async fn non_pending_task_is_not_executed() {
        let agent = ScriptedAgent::new("player");
        let calls = agent.calls.clone();
        let pool = pool_with(agent);
        let bus = EventBus::new(16);
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = task("player", "run", "x");
        runner.execute(&mut t).await.unwrap();
        let err = runner.execute(&mut t).await.unwrap_err();

        assert!(matches!(err, TaskError::NotPending(TaskStatus::Completed)));
        assert_eq!(t.status(), TaskStatus::Completed);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prepared_invocation_is_spawnable() {
        let pool = pool_with(ScriptedAgent::new("batting_coach"));
        let bus = EventBus::new(16);
        let runner = TaskRunner::new(&pool, &bus, Uuid::now_v7());

        let mut t = task("batting_coach", "run", "cover drive");
        let invocation = runner.prepare(&mut t).unwrap();
        assert_eq!(invocation.task_id(), t.id);
        assert_eq!(t.status(), TaskStatus::InProgress);

        let outcome = tokio::spawn(invocation.call()).await.unwrap();
        assert_eq!(outcome.task_id, t.id);
        let result = runner.finish(&mut t, outcome).unwrap();
        assert_eq!(result, "batting_coach:cover drive");
        assert_eq!(t.status(), TaskStatus::Completed);
    }
}
