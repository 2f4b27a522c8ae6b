use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use authgate_backend::{config::Settings, logging, router::create_router, AppState};
use clap::Parser;
use tokio::net::TcpListener;

/// Session authentication server
#[derive(Debug, Parser)]
#[command(name = "authgate", version, about)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = authgate_backend::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the credential store connection string
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load_from(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    settings.validate()?;

    logging::init(&settings)?;

    let addr = settings.bind_addr();
    let environment = settings.environment;
    let state = AppState::from_settings(settings)
        .await
        .context("failed to initialise application state")?;

    let app = create_router(Arc::new(state));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, ?environment, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
