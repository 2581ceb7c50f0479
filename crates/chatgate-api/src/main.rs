//! chatgate CLI and HTTP gateway entry point.
//!
//! Binary name: `chatgate`
//!
//! Parses CLI arguments, resolves configuration, connects to the history
//! store, then dispatches to a CLI command or starts the HTTP server.

mod cli;
mod http;
mod state;

use anyhow::{anyhow, Context};
use clap::Parser;
use clap_complete::generate;

use chatgate_infra::config::resolve_config;
use chatgate_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter, TracingOptions};

use cli::{Cli, Commands, HistoryCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatgate", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        default_filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = resolve_config(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    let state = AppState::init(config).await?;

    match cli.command {
        Commands::Serve { .. } => serve(state).await?,

        Commands::History { command } => match command {
            HistoryCommand::Show { session_id } => {
                cli::history::show_history(&state, &session_id, cli.json).await?;
            }
            HistoryCommand::Clear { session_id } => {
                cli::history::clear_history(&state, &session_id, cli.json).await?;
            }
        },

        Commands::Ask { session_id, query } => {
            cli::ask::ask(&state, session_id, query, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        addr = %addr,
        store = ?state.config.store.backend,
        worker = %state.config.worker.program,
        "chatgate listening"
    );

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
