//! Prebuilt workflows.

use serde::Serialize;

use dugout_core::Orchestrator;
use dugout_types::error::OrchestratorError;
use dugout_types::task::{TaskArguments, TaskId};
use dugout_types::workflow::{ExecutionMode, WorkflowId};

use crate::agents::cricket::{CricketRole, MATCH_INFO, PLAYER_NAME};

pub const TEAM_PREPARATION_NAME: &str = "Team Preparation Workflow";

/// Player name used when the caller does not name one.
pub const DEFAULT_PLAYER_NAME: &str = "Team Players";

/// Ids of a team-preparation workflow and its five tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamPreparation {
    pub workflow_id: WorkflowId,
    pub plan: TaskId,
    pub batting: TaskId,
    pub bowling: TaskId,
    pub fitness: TaskId,
    pub report: TaskId,
}

fn single_argument(name: &str, value: &str) -> TaskArguments {
    let mut arguments = TaskArguments::new();
    arguments.insert(name.to_string(), serde_json::Value::String(value.to_string()));
    arguments
}

/// Build the team-preparation workflow.
///
/// The head coach plans for `match_info`; the batting coach, bowling coach
/// and physio then work on `player_name`, each depending on the plan; the
/// player reports last, after all three.
pub fn plan_team_preparation(
    orchestrator: &mut Orchestrator,
    match_info: &str,
    player_name: &str,
    mode: ExecutionMode,
) -> Result<TeamPreparation, OrchestratorError> {
    let workflow_id = orchestrator.create_workflow_with_description(
        TEAM_PREPARATION_NAME,
        format!("Match preparation for {match_info}"),
        mode,
    );

    let mut add = |role: CricketRole, arguments: TaskArguments, deps: &[TaskId]| {
        orchestrator.add_task(
            workflow_id,
            role.kind(),
            role.operation().as_str(),
            arguments,
            deps.iter().copied(),
        )
    };

    let plan = add(CricketRole::HeadCoach, single_argument(MATCH_INFO, match_info), &[])?;
    let batting = add(CricketRole::BattingCoach, single_argument(PLAYER_NAME, player_name), &[plan])?;
    let bowling = add(CricketRole::BowlingCoach, single_argument(PLAYER_NAME, player_name), &[plan])?;
    let fitness = add(CricketRole::HeadPhysio, single_argument(PLAYER_NAME, player_name), &[plan])?;
    let report = add(
        CricketRole::Player,
        single_argument(PLAYER_NAME, player_name),
        &[batting, bowling, fitness],
    )?;

    Ok(TeamPreparation {
        workflow_id,
        plan,
        batting,
        bowling,
        fitness,
        report,
    })
}
