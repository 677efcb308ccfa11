//! Status ingestion and lookup endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::api::{error::ApiResult, state::ApiState, types::StatusReportBody};

/// POST /status
///
/// Ingest one drive-space report: persisted, classified, and alerted
/// if the throttle permits.
pub async fn post_status(
    State(state): State<ApiState>,
    Json(body): Json<StatusReportBody>,
) -> ApiResult<Json<Value>> {
    debug!(machine = %body.machine, "received status report");

    let outcome = state.engine.ingest(body.into_report()).await?;

    Ok(Json(json!({
        "success": true,
        "classification": outcome.classification,
        "alerted": outcome.notified,
    })))
}

/// GET /status/:machine
///
/// Latest known status for one machine.
pub async fn get_machine_status(
    State(state): State<ApiState>,
    Path(machine): Path<String>,
) -> ApiResult<Json<Value>> {
    let status = state.store.latest_for_machine(&machine).await?;

    match status {
        Some(status) => Ok(Json(json!(status))),
        None => Err(crate::api::ApiError::NotFound(format!(
            "no status for machine {machine}"
        ))),
    }
}
