//! HTTP boundary for report ingestion and fleet inspection
//!
//! ## Architecture
//!
//! - **Axum** web framework with Tower middleware
//! - **Engine handle** for ingestion, **store handle** for reads
//! - Wire-shape normalization lives in [`types`]; the engine only ever
//!   sees the canonical report shape
//!
//! ## Endpoints
//!
//! - `POST /status` - Ingest one drive-space report
//! - `GET /status/:machine` - Latest status for one machine
//! - `GET /report` - HTML fleet report
//! - `GET /health` - Health check

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;
pub use types::StatusReportBody;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:3004")
    pub bind_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3004".parse().unwrap(),
        }
    }
}

/// Build the router with all routes
///
/// Split out of [`spawn_api_server`] so tests can drive the router
/// without binding a socket.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/status", post(routes::status::post_status))
        .route("/status/:machine", get(routes::status::get_machine_status))
        .route("/report", get(routes::report::get_report))
        .route("/health", get(routes::health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
