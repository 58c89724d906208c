use axum::{http::header, response::IntoResponse};

/// Prometheus text exposition of the default registry.
pub async fn metrics() -> impl IntoResponse {
    let (status, body) = common::metrics::encode_metrics();
    (status, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
