//! HTML fleet report endpoint

use axum::{extract::State, response::Html};

use crate::api::{error::ApiResult, state::ApiState};
use crate::report::html_report;

/// GET /report
///
/// Render the latest status of every machine as an HTML table.
pub async fn get_report(State(state): State<ApiState>) -> ApiResult<Html<String>> {
    let statuses = state.store.all_latest().await?;
    Ok(Html(html_report(&statuses, &state.thresholds)))
}
