//! CLI command definitions for the `chatgate` binary.
//!
//! Uses clap derive macros for argument parsing. `serve` runs the HTTP
//! gateway; the other commands work against the same history store and
//! worker for inspection and smoke testing.

pub mod ask;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// HTTP gateway between a chat frontend and an external answer generator.
#[derive(Parser)]
#[command(name = "chatgate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./chatgate.toml if present).
    #[arg(short, long, global = true, env = "CHATGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "CHATGATE_LOG_JSON")]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway.
    Serve {
        /// Address to bind.
        #[arg(long, env = "CHATGATE_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long, env = "CHATGATE_PORT")]
        port: Option<u16>,
    },

    /// Inspect or delete a session's history.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Run a single chat turn from the command line.
    Ask {
        /// Session to append the turn to.
        session_id: String,

        /// Query passed to the worker.
        query: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Print the stored messages of a session.
    Show {
        session_id: String,
    },

    /// Delete a session.
    #[command(alias = "rm")]
    Clear {
        session_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["chatgate", "serve", "--port", "8080", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(8080)),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_history_clear_alias() {
        let cli = Cli::try_parse_from(["chatgate", "history", "rm", "s1"]).unwrap();
        match cli.command {
            Commands::History {
                command: HistoryCommand::Clear { session_id },
            } => assert_eq!(session_id, "s1"),
            _ => panic!("expected history clear"),
        }
    }
}
