//! CLI command definitions for the `dugout` binary.

pub mod agents;
pub mod workflow;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dugout_infra::workflows::DEFAULT_PLAYER_NAME;
use dugout_types::workflow::ExecutionMode;

/// Run a cricket coaching staff of LLM agents.
#[derive(Parser)]
#[command(name = "dugout", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered agents and whether they are live.
    #[command(alias = "ls")]
    Agents,

    /// Call one agent directly with a single input.
    Invoke {
        /// Agent kind (e.g. head_coach, batting_coach).
        kind: String,

        /// Input bound to the agent's default operation.
        input: String,
    },

    /// Run the team preparation workflow.
    Prepare {
        /// Match description handed to the head coach.
        #[arg(long)]
        match_info: String,

        /// Player or squad the coaches work on.
        #[arg(long, default_value = DEFAULT_PLAYER_NAME)]
        player: String,

        /// Execution mode (sequential or parallel). Defaults to the configured mode.
        #[arg(long)]
        mode: Option<ExecutionMode>,

        /// Print task results in full instead of a preview.
        #[arg(long)]
        full: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Verbosity to default `EnvFilter` directive.
pub fn log_directive(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,dugout_core=debug,dugout_infra=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_prepare_with_defaults() {
        let cli = Cli::try_parse_from(["dugout", "prepare", "--match-info", "India vs Australia"]).unwrap();
        match cli.command {
            Commands::Prepare {
                match_info,
                player,
                mode,
                full,
            } => {
                assert_eq!(match_info, "India vs Australia");
                assert_eq!(player, DEFAULT_PLAYER_NAME);
                assert_eq!(mode, None);
                assert!(!full);
            }
            _ => panic!("expected prepare"),
        }
    }

    #[test]
    fn parses_mode_and_global_flags() {
        let cli = Cli::try_parse_from([
            "dugout",
            "prepare",
            "--match-info",
            "final",
            "--mode",
            "parallel",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Prepare {
                mode: Some(ExecutionMode::Parallel),
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = Cli::try_parse_from(["dugout", "prepare", "--match-info", "x", "--mode", "shuffle"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_invoke() {
        let cli = Cli::try_parse_from(["dugout", "invoke", "head_physio", "Bumrah"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Invoke { kind, input } if kind == "head_physio" && input == "Bumrah"
        ));
    }

    #[test]
    fn verbosity_directives() {
        assert_eq!(log_directive(0, true), "error");
        assert_eq!(log_directive(0, false), "warn");
        assert!(log_directive(1, false).starts_with("info"));
        assert_eq!(log_directive(3, false), "trace");
    }
}
