use std::path::Path;

use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::admin_auth::{require_admin_key, ADMIN_KEY_HEADER};
use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod admin;
pub mod deals;
pub mod early_access;
pub mod health;
pub mod kyc;
pub mod metrics;
pub mod newsletter;

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Empty list (development) is permissive; otherwise only the listed origins.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::very_permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static(ADMIN_KEY_HEADER),
        ])
}

/// Build the full application router: public API, admin API, docs, metrics and the SPA fallback.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: &str) -> Router {
    let index = Path::new(static_dir).join("index.html");
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let public = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", delete(newsletter::unsubscribe))
        .route("/api/early-access", post(early_access::submit))
        .route("/api/kyc/health", get(kyc::kyc_health))
        .route("/api/kyc/access-token", post(kyc::access_token))
        .route("/api/kyc/status/:user_id", get(kyc::status))
        .route("/api/deals", get(deals::list))
        .route("/api/deals/:slug", get(deals::get));

    let admin_routes = Router::new()
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/early-access", get(admin::early_access))
        .route("/api/admin/newsletter", get(admin::newsletter))
        .route("/api/admin/users", get(admin::users))
        .route("/api/admin/users/:id", get(admin::user_detail).put(admin::update_user))
        .route("/api/admin/deals", post(admin::create_deal))
        .route("/api/admin/deals/:id", put(admin::update_deal))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_key));

    public
        .merge(admin_routes)
        .route("/metrics", get(metrics::metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // 未知 /api 路径返回 JSON 404，其余交给前端 SPA
        .fallback(move |req: Request| {
            let spa = spa.clone();
            async move {
                if is_api_path(req.uri().path()) {
                    return ApiError::not_found("Not found").into_response();
                }
                match spa.oneshot(req).await {
                    Ok(resp) => resp.into_response(),
                    Err(never) => match never {},
                }
            }
        })
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时记录状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::is_api_path;

    #[test]
    fn api_prefix_detection() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/nope"));
        assert!(!is_api_path("/apiary"));
        assert!(!is_api_path("/deals/lisbon"));
    }
}
