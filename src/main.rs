// src/main.rs

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use sui_mcp_server::{
    api::run_http_server, blockchain::client::SuiRpcConnector, config::Config,
    mcp::transport, AppState,
};
use tokio::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(ansi: bool) {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sui_mcp_server=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi),
        )
        .init();
}

// --- MCP Server Logic ---
async fn run_mcp_server(state: AppState) -> Result<()> {
    info!(
        "Starting MCP server on stdin/stdout ({} tools, network {})",
        state.tools.catalog().len(),
        state.network.current()
    );
    transport::serve(io::stdin(), io::stdout(), state).await?;
    info!("EOF received, MCP server shutting down");
    Ok(())
}

fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let http_mode = env::args().any(|arg| arg == "--http") || config.http_mode;
    init_tracing(http_mode);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(config, http_mode))
}

async fn run(config: Config, http_mode: bool) -> Result<()> {
    let connector = Arc::new(SuiRpcConnector::new()?);
    let state = AppState::new(config, connector)?;

    if http_mode {
        run_http_server(state).await
    } else {
        run_mcp_server(state).await
    }
}
