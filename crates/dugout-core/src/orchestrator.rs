//! The orchestrator: owner of live agents and workflows.
//!
//! All mutable state (the agent pool and the workflow store) lives in one
//! `Orchestrator` value and changes only through the methods below.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tracing::{Instrument, info_span};

use dugout_types::agent::{AgentProfile, CustomAgentSpec};
use dugout_types::error::{AgentError, OrchestratorError, TaskError};
use dugout_types::event::WorkflowEvent;
use dugout_types::task::{Task, TaskArguments, TaskId};
use dugout_types::workflow::{ExecutionMode, Workflow, WorkflowId, WorkflowSummary, WorkflowView};

use crate::agent::{AgentPool, AgentRegistry, BoxAgent, CustomAgent, InitReport};
use crate::event::bus::EventBus;
use crate::llm::PromptEngine;
use crate::workflow::dag;
use crate::workflow::executor::{self, ExecutionReport};
use crate::workflow::runner::TaskRunner;

/// Coordinates agents and the workflows that run them.
pub struct Orchestrator {
    registry: AgentRegistry,
    pool: AgentPool,
    workflows: HashMap<WorkflowId, Workflow>,
    /// Workflow ids in creation order.
    order: Vec<WorkflowId>,
    events: EventBus,
}

impl Orchestrator {
    /// Create an orchestrator with no live agents.
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            pool: AgentPool::new(),
            workflows: HashMap::new(),
            order: Vec::new(),
            events: EventBus::default(),
        }
    }

    /// Replace the event bus (e.g. to share one with an API layer).
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Receive workflow events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Agents
    // -----------------------------------------------------------------------

    /// Create a live agent for every registered kind.
    pub fn initialize_all_agents(&mut self) -> InitReport {
        let kinds: Vec<String> = self.registry.kinds().into_iter().map(str::to_string).collect();
        self.initialize_agents(kinds)
    }

    /// Create live agents for `kinds`. Unknown kinds are skipped.
    ///
    /// An already-live kind is replaced by a fresh instance.
    pub fn initialize_agents<I, S>(&mut self, kinds: I) -> InitReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = InitReport::default();
        for kind in kinds {
            let kind = kind.as_ref();
            match self.registry.construct(kind) {
                Some(agent) => {
                    self.pool.insert(kind, agent);
                    tracing::info!(agent_kind = kind, "initialized agent");
                    report.initialized.push(kind.to_string());
                }
                None => {
                    tracing::warn!(agent_kind = kind, "unknown agent type, skipping");
                    report.unknown.push(kind.to_string());
                }
            }
        }
        report
    }

    /// Register a runtime-defined agent and make it live immediately.
    ///
    /// A kind that is already registered is replaced, built-in kinds
    /// included. Returns true in that case.
    pub fn register_custom_agent(&mut self, spec: CustomAgentSpec, engine: PromptEngine) -> bool {
        let kind = spec.kind.clone();
        let replaced = self.registry.contains(&kind);
        if replaced {
            tracing::warn!(agent_kind = kind.as_str(), "custom agent replaces an existing agent kind");
        }
        let profile = CustomAgent::profile(&spec);
        self.registry.register(profile, move || {
            BoxAgent::new(CustomAgent::new(spec.clone(), engine.clone()))
        });
        self.initialize_agents([kind.as_str()]);
        replaced
    }

    /// Kinds with a live agent, sorted.
    pub fn list_agents(&self) -> Vec<String> {
        self.pool.kinds()
    }

    /// Catalog entries for every registered kind, sorted by kind.
    pub fn agent_profiles(&self) -> Vec<&AgentProfile> {
        self.registry.profiles()
    }

    /// Call one agent directly, outside any workflow.
    ///
    /// `input` is bound to the kind's input argument and passed to its
    /// default operation.
    pub async fn invoke_agent(&self, kind: &str, input: &str) -> Result<String, OrchestratorError> {
        let agent = self
            .pool
            .get(kind)
            .ok_or_else(|| OrchestratorError::AgentNotInitialized(kind.to_string()))?;
        let profile = self
            .registry
            .profile(kind)
            .ok_or_else(|| OrchestratorError::AgentNotInitialized(kind.to_string()))?;

        let mut arguments = TaskArguments::new();
        arguments.insert(
            profile.input_argument.clone(),
            serde_json::Value::String(input.to_string()),
        );

        let span = info_span!(
            "dugout.invoke_agent",
            dugout.agent.kind = kind,
            dugout.agent.operation = profile.default_operation.as_str(),
        );
        agent
            .invoke(&profile.default_operation, &arguments)
            .instrument(span)
            .await
            .map_err(|err| match err {
                AgentError::UnknownOperation(operation) => {
                    OrchestratorError::Task(TaskError::UnknownOperation {
                        agent_kind: kind.to_string(),
                        operation,
                    })
                }
                other => OrchestratorError::Task(other.into()),
            })
    }

    // -----------------------------------------------------------------------
    // Workflows
    // -----------------------------------------------------------------------

    /// Create an empty Pending workflow.
    pub fn create_workflow(&mut self, name: impl Into<String>, mode: ExecutionMode) -> WorkflowId {
        self.insert_workflow(Workflow::new(name, mode))
    }

    pub fn create_workflow_with_description(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        mode: ExecutionMode,
    ) -> WorkflowId {
        self.insert_workflow(Workflow::new(name, mode).with_description(description))
    }

    fn insert_workflow(&mut self, workflow: Workflow) -> WorkflowId {
        let id = workflow.id;
        tracing::info!(
            workflow_id = %id,
            workflow = workflow.name.as_str(),
            mode = %workflow.mode,
            "created workflow"
        );
        self.workflows.insert(id, workflow);
        self.order.push(id);
        id
    }

    /// Append a Pending task to a workflow.
    ///
    /// Prerequisite ids are not validated here; forward references are
    /// resolved at execution time.
    pub fn add_task(
        &mut self,
        workflow_id: WorkflowId,
        agent_kind: impl Into<String>,
        operation: impl Into<String>,
        arguments: TaskArguments,
        prerequisites: impl IntoIterator<Item = TaskId>,
    ) -> Result<TaskId, OrchestratorError> {
        let workflow = self
            .workflows
            .get_mut(&workflow_id)
            .ok_or(OrchestratorError::WorkflowNotFound(workflow_id))?;

        let task = Task::new(agent_kind, operation, arguments, prerequisites);
        tracing::debug!(
            workflow_id = %workflow_id,
            task_id = %task.id,
            agent_kind = task.agent_kind.as_str(),
            operation = task.operation.as_str(),
            "added task"
        );
        Ok(workflow.push_task(task))
    }

    /// Drive a workflow with the strategy matching its mode.
    ///
    /// Fails without running anything if the workflow is unknown, its mode
    /// has no strategy, or its prerequisite graph is cyclic. Per-task
    /// faults are recorded on the tasks and never fail this call.
    pub async fn execute_workflow(
        &mut self,
        workflow_id: WorkflowId,
    ) -> Result<ExecutionReport, OrchestratorError> {
        let workflow = self
            .workflows
            .get_mut(&workflow_id)
            .ok_or(OrchestratorError::WorkflowNotFound(workflow_id))?;

        if !workflow.mode.is_implemented() {
            return Err(OrchestratorError::UnsupportedMode(workflow.mode));
        }

        dag::detect_cycle(workflow.tasks()).map_err(|err| {
            let dag::DagError::CycleDetected(task_id) = err;
            tracing::warn!(workflow_id = %workflow_id, task_id = %task_id, "refusing to run cyclic workflow");
            OrchestratorError::CyclicDependency { task_id }
        })?;

        let runner = TaskRunner::new(&self.pool, &self.events, workflow_id);
        let report = match workflow.mode {
            ExecutionMode::Parallel => executor::run_parallel(workflow, &runner).await,
            _ => executor::run_sequential(workflow, &runner).await,
        };
        Ok(report)
    }

    /// Short listings of every workflow, in creation order.
    pub fn list_workflows(&self) -> Vec<WorkflowSummary> {
        self.order
            .iter()
            .filter_map(|id| self.workflows.get(id))
            .map(Workflow::summary)
            .collect()
    }

    /// Full read-only projection of one workflow.
    pub fn workflow_status(&self, workflow_id: WorkflowId) -> Result<WorkflowView, OrchestratorError> {
        self.workflow(workflow_id).map(Workflow::view)
    }

    pub fn workflow(&self, workflow_id: WorkflowId) -> Result<&Workflow, OrchestratorError> {
        self.workflows
            .get(&workflow_id)
            .ok_or(OrchestratorError::WorkflowNotFound(workflow_id))
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("live_agents", &self.pool.kinds())
            .field("workflows", &self.order.len())
            .finish()
    }
}
