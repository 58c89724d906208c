use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/health`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn connected(version: &str) -> Self {
        Self {
            success: true,
            status: "ok".into(),
            database: "connected".into(),
            version: version.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn disconnected(version: &str) -> Self {
        Self {
            success: false,
            status: "degraded".into(),
            database: "disconnected".into(),
            version: version.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// One entry of the `details` array on a 400 response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Paginated list envelope used by the admin endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub success: bool,
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}
