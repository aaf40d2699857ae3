//! HTTP surface for the browser UI

pub mod markets;

use anyhow::{Context, Result};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::core::MarketService;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn app_router(service: MarketService) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(markets::router())
        .with_state(service)
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Serves the API until the process is interrupted.
pub async fn serve(service: MarketService, listen_addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;
    info!("Listening on {}", listen_addr);

    axum::serve(listener, app_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}
