use axum::{
    extract::{FromRequest, Path, Request, State},
    Json,
};
use serde_json::{json, Value};
use service::errors::ServiceError;
use service::services::kyc::{AccessTokenRequest, PROVIDER_NAME};

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/kyc/health", tag = "kyc",
    responses((status = 200, description = "Provider configuration"))
)]
pub async fn kyc_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"success": true, "provider": PROVIDER_NAME, "configured": state.kyc.configured()}))
}

#[utoipa::path(
    post, path = "/api/kyc/access-token", tag = "kyc",
    request_body = crate::openapi::AccessTokenDoc,
    responses(
        (status = 200, description = "Token issued"),
        (status = 400, description = "Invalid userId", body = crate::openapi::ErrorDoc),
        (status = 503, description = "Provider not configured", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn access_token(State(state): State<AppState>, req: Request) -> Result<Json<Value>, ApiError> {
    // 未配置时优先返回 503，再解析请求体
    if !state.kyc.configured() {
        return Err(ServiceError::NotConfigured("kyc provider").into());
    }
    let ApiJson(body): ApiJson<AccessTokenRequest> = ApiJson::from_request(req, &state).await?;
    let token = state.kyc.access_token(body).await?;
    Ok(Json(json!({
        "success": true,
        "token": token.token,
        "userId": token.user_id,
        "levelName": token.level_name,
        "expiresInSecs": token.expires_in_secs,
    })))
}

#[utoipa::path(
    get, path = "/api/kyc/status/{userId}", tag = "kyc",
    params(("userId" = String, Path, description = "Auth-provider user id")),
    responses(
        (status = 200, description = "Current status"),
        (status = 503, description = "Provider not configured", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn status(State(state): State<AppState>, Path(user_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let view = state.kyc.status(&user_id).await?;
    let mut body = serde_json::to_value(&view).map_err(|e| ApiError::internal(&e))?;
    body["success"] = Value::Bool(true);
    Ok(Json(body))
}

