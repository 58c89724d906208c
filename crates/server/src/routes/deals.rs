use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/deals", tag = "deals",
    responses((status = 200, description = "Open deals, newest first"))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deals = state.deals.open_deals().await?;
    Ok(Json(json!({"success": true, "deals": deals})))
}

#[utoipa::path(
    get, path = "/api/deals/{slug}", tag = "deals",
    params(("slug" = String, Path, description = "Deal slug")),
    responses(
        (status = 200, description = "Deal"),
        (status = 404, description = "Unknown or unpublished", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Value>, ApiError> {
    let deal = state.deals.by_slug(&slug).await?;
    Ok(Json(json!({"success": true, "deal": deal})))
}
