//! dugout CLI entry point.
//!
//! Binary name: `dugout`
//!
//! Parses CLI arguments, sets up tracing, wires the configured LLM provider
//! into the built-in agents, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use dugout_observe::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions {
        default_directive: cli::log_directive(cli.verbose, cli.quiet).to_string(),
        enable_otel: cli.otel,
        ..TracingOptions::default()
    };
    init_tracing(&options).map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "dugout", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(&cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut state = AppState::init().await?;

    match &cli.command {
        Commands::Agents => cli::agents::list_agents(&state, cli.json)?,

        Commands::Invoke { kind, input } => {
            cli::agents::invoke_agent(&state, kind, input, cli.json, cli.quiet).await?;
        }

        Commands::Prepare {
            match_info,
            player,
            mode,
            full,
        } => {
            cli::workflow::prepare(&mut state, match_info, player, *mode, *full, cli.json, cli.quiet).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
