//! # API Module
//!
//! Optional HTTP transport for the MCP server.
//!
//! ## Available Endpoints
//! - `GET /health` - liveness check
//! - `POST /rpc` - a single JSON-RPC request, handled exactly as on stdio

pub mod health;
pub mod rpc;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::AppState;

/// Router with every HTTP endpoint, tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/rpc", post(rpc::rpc_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn run_http_server(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("HTTP server failed")
}
