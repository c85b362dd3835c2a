//! Team preparation workflow command.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use dugout_infra::workflows::{TeamPreparation, plan_team_preparation};
use dugout_types::event::WorkflowEvent;
use dugout_types::task::{TaskId, TaskStatus};
use dugout_types::workflow::{ExecutionMode, WorkflowId};

use crate::state::AppState;

/// Characters of each result shown without `--full`.
const PREVIEW_CHARS: usize = 500;

/// Build and run the team preparation workflow, then print every task.
pub async fn prepare(
    state: &mut AppState,
    match_info: &str,
    player: &str,
    mode: Option<ExecutionMode>,
    full: bool,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let mode = mode.unwrap_or(state.config.orchestrator.default_mode);
    let plan = plan_team_preparation(&mut state.orchestrator, match_info, player, mode)?;
    tracing::info!(workflow_id = %plan.workflow_id, mode = %mode, "team preparation planned");

    if !json && !quiet {
        println!();
        println!(
            "  {} Preparing for {} ({} mode)",
            style("*").green().bold(),
            style(match_info).cyan(),
            mode
        );
        println!();
    }

    let progress = (!json && !quiet).then(|| spawn_progress(state.orchestrator.subscribe(), plan));

    let report = match state.orchestrator.execute_workflow(plan.workflow_id).await {
        Ok(report) => report,
        Err(err) => {
            if let Some(handle) = progress {
                handle.abort();
            }
            return Err(err.into());
        }
    };
    if let Some(handle) = progress {
        await_progress(handle).await;
    }

    let view = state.orchestrator.workflow_status(plan.workflow_id)?;

    if json {
        let out = serde_json::json!({
            "workflow": view,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Step").fg(Color::Cyan),
                Cell::new("Agent"),
                Cell::new("Operation"),
                Cell::new("Status"),
            ]);
        for task in &view.tasks {
            table.add_row(vec![
                Cell::new(step_label(&plan, task.id)),
                Cell::new(&task.agent_kind),
                Cell::new(&task.operation),
                Cell::new(task.status).fg(status_color(task.status)),
            ]);
        }

        if !quiet {
            println!("{table}");
            println!();
        }

        for task in &view.tasks {
            let heading = style(step_label(&plan, task.id)).bold();
            match (&task.result, &task.error) {
                (Some(result), _) => {
                    println!("  {heading}");
                    let body = if full {
                        result.clone()
                    } else {
                        preview(result, PREVIEW_CHARS)
                    };
                    println!("{body}");
                    println!();
                }
                (None, Some(error)) => {
                    println!("  {heading} {}", style(format!("failed: {error}")).red());
                    println!();
                }
                (None, None) => {
                    println!("  {heading} {}", style("not run").dim());
                    println!();
                }
            }
        }

        if !quiet {
            println!(
                "  {} completed, {} failed, {} stalled in {} ms",
                style(report.completed.len()).green(),
                style(report.failed.len()).red(),
                style(report.stalled.len()).yellow(),
                report.elapsed_ms
            );
            println!();
        }
    }

    if !report.is_clean() {
        anyhow::bail!(
            "workflow {} finished with {} failed and {} stalled tasks",
            plan.workflow_id,
            report.failed.len(),
            report.stalled.len()
        );
    }
    Ok(())
}

/// Print task lifecycle events to stderr until the workflow finishes.
fn spawn_progress(mut events: broadcast::Receiver<WorkflowEvent>, plan: TeamPreparation) -> JoinHandle<()> {
    let workflow_id: WorkflowId = plan.workflow_id;
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "progress display lagged behind events");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if event.workflow_id() != workflow_id {
                continue;
            }
            match event {
                WorkflowEvent::TaskStarted { task_id, .. } => {
                    eprintln!("  {} {}", style("...").dim(), step_label(&plan, task_id));
                }
                WorkflowEvent::TaskCompleted {
                    task_id, duration_ms, ..
                } => {
                    eprintln!(
                        "  {} {} {}",
                        style("ok").green(),
                        step_label(&plan, task_id),
                        style(format!("({duration_ms} ms)")).dim()
                    );
                }
                WorkflowEvent::TaskFailed { task_id, error, .. } => {
                    eprintln!("  {} {}: {error}", style("failed").red(), step_label(&plan, task_id));
                }
                WorkflowEvent::TaskStalled { task_id, .. } => {
                    eprintln!("  {} {}", style("blocked").yellow(), step_label(&plan, task_id));
                }
                WorkflowEvent::WorkflowFinished { .. } => {
                    eprintln!();
                    break;
                }
                WorkflowEvent::WorkflowStarted { .. } => {}
            }
        }
    })
}

/// Wait for the progress display. Returns false if it panicked or was
/// cancelled.
async fn await_progress(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "progress display ended early");
            false
        }
    }
}

/// Human-readable name of a team preparation step.
fn step_label(plan: &TeamPreparation, task_id: TaskId) -> &'static str {
    if task_id == plan.plan {
        "Match strategy"
    } else if task_id == plan.batting {
        "Batting technique"
    } else if task_id == plan.bowling {
        "Bowling technique"
    } else if task_id == plan.fitness {
        "Fitness assessment"
    } else if task_id == plan.report {
        "Player report"
    } else {
        "Task"
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::Failed => Color::Red,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::Pending | TaskStatus::Cancelled => Color::DarkGrey,
    }
}

/// First `max_chars` characters of `text`, with a marker when cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
