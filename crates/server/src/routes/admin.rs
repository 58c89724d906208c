//! `/api/admin/*`, mounted behind [`crate::admin_auth::require_admin_key`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Page;
use serde::Serialize;
use serde_json::{json, Value};
use service::pagination::{Paged, Pagination};
use service::services::admin::{CreateDealRequest, UpdateDealRequest, UpdateUserRequest};

use crate::errors::ApiError;
use crate::extract::{parse_id, ApiJson, ApiQuery};
use crate::state::AppState;

fn page<T: Serialize>(p: Paged<T>) -> Json<Page<T>> {
    Json(Page { success: true, items: p.items, page: p.page, per_page: p.per_page, total: p.total })
}

#[utoipa::path(
    get, path = "/api/admin/stats", tag = "admin",
    responses((status = 200, description = "Dashboard counters"), (status = 401, description = "Bad admin key"))
)]
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = state.admin.stats().await?;
    Ok(Json(json!({"success": true, "stats": stats})))
}

#[utoipa::path(
    get, path = "/api/admin/early-access", tag = "admin",
    params(crate::openapi::PageParams),
    responses((status = 200, description = "Submissions, newest first"))
)]
pub async fn early_access(
    State(state): State<AppState>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<models::early_access_submission::Model>>, ApiError> {
    Ok(page(state.admin.early_access(p).await?))
}

#[utoipa::path(
    get, path = "/api/admin/newsletter", tag = "admin",
    params(crate::openapi::PageParams),
    responses((status = 200, description = "Subscribers"))
)]
pub async fn newsletter(
    State(state): State<AppState>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<models::newsletter_subscriber::Model>>, ApiError> {
    Ok(page(state.admin.subscribers(p).await?))
}

#[utoipa::path(
    get, path = "/api/admin/users", tag = "admin",
    params(crate::openapi::PageParams),
    responses((status = 200, description = "Users"))
)]
pub async fn users(
    State(state): State<AppState>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Page<models::user::Model>>, ApiError> {
    Ok(page(state.admin.users(p).await?))
}

#[utoipa::path(
    get, path = "/api/admin/users/{id}", tag = "admin",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses((status = 200, description = "User with related records"), (status = 404, description = "No such user"))
)]
pub async fn user_detail(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let detail = state.admin.user_detail(parse_id("id", &id)?).await?;
    let mut body = serde_json::to_value(&detail).map_err(|e| ApiError::internal(&e))?;
    body["success"] = Value::Bool(true);
    Ok(Json(body))
}

#[utoipa::path(
    put, path = "/api/admin/users/{id}", tag = "admin",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = crate::openapi::UpdateUserDoc,
    responses((status = 200, description = "Updated user"), (status = 404, description = "No such user"))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state.admin.update_user(parse_id("id", &id)?, req).await?;
    Ok(Json(json!({"success": true, "user": user})))
}

#[utoipa::path(
    post, path = "/api/admin/deals", tag = "admin",
    request_body = crate::openapi::CreateDealDoc,
    responses((status = 201, description = "Created"), (status = 409, description = "Slug taken"))
)]
pub async fn create_deal(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDealRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let deal = state.admin.create_deal(req).await?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "deal": deal}))))
}

#[utoipa::path(
    put, path = "/api/admin/deals/{id}", tag = "admin",
    params(("id" = uuid::Uuid, Path, description = "Deal id")),
    request_body = crate::openapi::UpdateDealDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "No such deal"))
)]
pub async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateDealRequest>,
) -> Result<Json<Value>, ApiError> {
    let deal = state.admin.update_deal(parse_id("id", &id)?, req).await?;
    Ok(Json(json!({"success": true, "deal": deal})))
}
