use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use service::services::early_access::{EarlyAccessOutcome, EarlyAccessRequest};

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/early-access", tag = "early-access",
    request_body = crate::openapi::EarlyAccessDoc,
    responses(
        (status = 201, description = "Stored"),
        (status = 200, description = "Email already submitted"),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EarlyAccessRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    Ok(match state.early_access.submit(req).await? {
        EarlyAccessOutcome::Created(id) => (StatusCode::CREATED, Json(json!({"success": true, "id": id}))),
        EarlyAccessOutcome::AlreadySubmitted(id) => {
            (StatusCode::OK, Json(json!({"success": true, "alreadySubmitted": true, "id": id})))
        }
    })
}
