//! Health check endpoint

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::api::{error::ApiResult, state::ApiState};

/// GET /health
///
/// Lightweight liveness check backed by the storage health probe.
pub async fn health_check(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let health = state.store.health_check().await?;

    Ok(Json(json!({
        "status": if health.healthy { "ok" } else { "degraded" },
        "storage": health.message,
    })))
}
