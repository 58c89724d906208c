use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Middleware for `/api/admin/*`: 503 when no key is configured, 401 on a missing or wrong `X-Admin-Key`.
pub async fn require_admin_key(State(state): State<AppState>, req: Request, next: Next) -> Result<Response, ApiError> {
    let Some(key) = &state.admin_key else {
        return Err(ApiError::unavailable("admin api is not configured"));
    };
    let provided = req.headers().get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok());
    match provided {
        Some(candidate) if key.matches(candidate) => Ok(next.run(req).await),
        Some(_) => {
            warn!(path = %req.uri().path(), "admin key mismatch");
            Err(ApiError::unauthorized())
        }
        None => Err(ApiError::unauthorized()),
    }
}
