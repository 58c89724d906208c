use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::FieldError;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error envelope: `{success:false, error, details?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: Vec::new() }
    }

    pub fn validation(details: Vec<FieldError>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: "Validation failed".into(), details }
    }

    pub fn not_found(message: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, message) }

    pub fn unauthorized() -> Self { Self::new(StatusCode::UNAUTHORIZED, "Unauthorized") }

    pub fn unavailable(message: impl Into<String>) -> Self { Self::new(StatusCode::SERVICE_UNAVAILABLE, message) }

    /// Client never sees the cause; it is logged instead.
    pub fn internal(cause: &dyn std::fmt::Display) -> Self {
        error!(error = %cause, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = (!self.details.is_empty()).then_some(self.details.as_slice());
        let body = ErrorBody { success: false, error: &self.message, details };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if matches!(e, ServiceError::Upstream(_) | ServiceError::Db(_)) {
            return ApiError::internal(&e);
        }
        match e {
            ServiceError::Invalid(details) => ApiError::validation(details),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            ServiceError::NotConfigured(what) => ApiError::unavailable(format!("{what} is not configured")),
            other => ApiError::internal(&other),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("integration setup failed: {0}")]
    Integration(#[from] service::integrations::IntegrationError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::integrations::IntegrationError;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_carries_details() {
        let (status, body) = body_of(ServiceError::invalid("email", "must be a valid email address").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["details"][0]["field"], "email");
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        let err = ServiceError::Upstream(IntegrationError::Status { status: 401, body: "secret detail".into() });
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn not_configured_is_503() {
        let (status, _) = body_of(ServiceError::NotConfigured("kyc provider").into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
