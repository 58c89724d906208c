use axum::{extract::State, http::StatusCode, Json};
use common::types::HealthResponse;

use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/health", tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = crate::openapi::HealthDoc),
        (status = 503, description = "Database unreachable", body = crate::openapi::HealthDoc)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.health.check().await;
    let status = if report.success { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(report))
}
