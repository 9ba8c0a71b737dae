//! KleinBot webhook server and CLI entry point.
//!
//! Binary name: `kleinbot`
//!
//! Loads configuration, initializes tracing, then either serves the
//! Messenger webhook or runs an offline diagnostic command.

mod cli;
mod http;
mod state;

use clap::Parser;
use tokio::net::TcpListener;

use cli::{Cli, Commands};
use kleinbot_infra::config::load_config;
use kleinbot_infra::secret::Secrets;
use kleinbot_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_directive};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_directive(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let mut config = load_config(&cli.config).await;

    let result = match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Classify { message, all } => cli::classify::run(&config, &message.join(" "), all),
        Commands::CheckConfig => cli::check_config::run(&config),
    };

    shutdown_tracing();
    result
}

async fn serve(config: kleinbot_types::config::KleinConfig) -> anyhow::Result<()> {
    let secrets = Secrets::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::init(&config, secrets)?;
    let router = http::router::build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "KleinBot listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
