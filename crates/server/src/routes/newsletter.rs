use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use service::services::newsletter::{SubscribeOutcome, SubscribeRequest, UnsubscribeRequest};

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/newsletter/subscribe", tag = "newsletter",
    request_body = crate::openapi::SubscribeDoc,
    responses(
        (status = 201, description = "Subscribed"),
        (status = 200, description = "Already subscribed or reactivated"),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubscribeRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let reply = match state.newsletter.subscribe(req).await? {
        SubscribeOutcome::Created => (StatusCode::CREATED, json!({"success": true, "alreadySubscribed": false})),
        SubscribeOutcome::AlreadySubscribed => (StatusCode::OK, json!({"success": true, "alreadySubscribed": true})),
        SubscribeOutcome::Resubscribed => {
            (StatusCode::OK, json!({"success": true, "alreadySubscribed": false, "resubscribed": true}))
        }
    };
    Ok((reply.0, Json(reply.1)))
}

#[utoipa::path(
    delete, path = "/api/newsletter/unsubscribe", tag = "newsletter",
    request_body = crate::openapi::UnsubscribeDoc,
    responses(
        (status = 200, description = "Unsubscribed"),
        (status = 404, description = "Unknown address", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UnsubscribeRequest>,
) -> Result<Json<Value>, ApiError> {
    state.newsletter.unsubscribe(req).await?;
    Ok(Json(json!({"success": true})))
}
