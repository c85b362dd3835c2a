//! Agent listing and direct invocation.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

/// List every registered agent kind with its operations.
pub fn list_agents(state: &AppState, json: bool) -> anyhow::Result<()> {
    let orchestrator = &state.orchestrator;
    let live = orchestrator.list_agents();
    let profiles = orchestrator.agent_profiles();

    if json {
        let out: Vec<serde_json::Value> = profiles
            .iter()
            .map(|p| {
                serde_json::json!({
                    "kind": p.kind,
                    "name": p.name,
                    "role": p.role,
                    "description": p.description,
                    "capabilities": p.capabilities,
                    "operations": p.operations,
                    "default_operation": p.default_operation,
                    "live": live.contains(&p.kind),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!();
        println!("  No agents registered.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Kind").fg(Color::Cyan),
            Cell::new("Name"),
            Cell::new("Role"),
            Cell::new("Operations"),
            Cell::new("Live"),
        ]);

    for p in &profiles {
        let live_cell = if live.contains(&p.kind) {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(&p.kind),
            Cell::new(&p.name),
            Cell::new(&p.role),
            Cell::new(p.operations.join(", ")),
            live_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} live of {} registered  {}",
        live.len(),
        profiles.len(),
        style(format!("(config: {})", state.data_dir.join("config.toml").display())).dim()
    );
    println!();

    Ok(())
}

/// Call one agent with `input` and print its reply.
pub async fn invoke_agent(state: &AppState, kind: &str, input: &str, json: bool, quiet: bool) -> anyhow::Result<()> {
    let output = state.orchestrator.invoke_agent(kind, input).await?;

    if json {
        let out = serde_json::json!({
            "agent_kind": kind,
            "input": input,
            "output": output,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if !quiet {
        println!();
        println!("  {} {}", style("*").green().bold(), style(kind).cyan());
        println!();
    }
    println!("{output}");
    Ok(())
}
