//! Colloquy CLI and HTTP API entry point.
//!
//! Binary name: `colloquy`
//!
//! Parses CLI arguments, sets up tracing, wires the store and provider, then
//! runs a one-shot command or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::{AppState, InitOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Commands::Serve { .. });
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if serving => "info",
        0 => "warn",
        1 => "info,colloquy_core=debug,colloquy_infra=debug,colloquy_api=debug",
        _ => "trace",
    };
    colloquy_observe::tracing_setup::init_tracing(filter, enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "colloquy", &mut std::io::stdout());
        return Ok(());
    }

    let memory = matches!(cli.command, Commands::Serve { memory: true, .. });
    let state = AppState::init(InitOptions { memory }).await?;

    let result = run(cli, state).await;
    colloquy_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port, .. } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            serve(state, &host, port, cli.quiet).await?;
        }

        Commands::Chat { message, session } => {
            cli::chat::send_message(&state, message, session, cli.json).await?;
        }

        Commands::History { session } => {
            cli::session::show_history(&state, &session, cli.json).await?;
        }

        Commands::Clear { session } => {
            cli::session::clear_session(&state, &session, cli.json).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} Colloquy listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!(
            "  {}",
            console::style(format!(
                "store: {:?}, provider: {}, data: {}",
                state.storage,
                state.chat_service.provider_name(),
                state.data_dir.display()
            ))
            .dim()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
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
