//! Sumsub KYC REST client.
//!
//! Every request carries `X-App-Token`, `X-App-Access-Ts` and
//! `X-App-Access-Sig`, the latter being hex HMAC-SHA256 of
//! `ts + METHOD + path_with_query + body` keyed with the app secret.

use std::time::Duration;

use async_trait::async_trait;
use configs::SumsubConfig;
use hmac::{Hmac, Mac};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, instrument};
use url::{Position, Url};

use super::{status_error, AccessToken, ApplicantReview, IntegrationError, KycProvider};

type HmacSha256 = Hmac<Sha256>;

pub struct SumsubClient {
    http: reqwest::Client,
    base_url: String,
    app_token: String,
    secret_key: String,
    level_name: String,
    token_ttl_secs: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenBody {
    token: String,
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicantBody {
    id: String,
    #[serde(default)]
    review: Option<ReviewBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    #[serde(default)]
    review_status: Option<String>,
    #[serde(default)]
    review_result: Option<ReviewResultBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewResultBody {
    #[serde(default)]
    review_answer: Option<String>,
    #[serde(default)]
    review_reject_type: Option<String>,
}

/// Hex HMAC-SHA256 over `ts + METHOD + path_with_query + body`.
pub fn sign(secret: &str, ts: i64, method: &str, path_with_query: &str, body: &[u8]) -> Result<String, IntegrationError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| IntegrationError::Setup(e.to_string()))?;
    mac.update(ts.to_string().as_bytes());
    mac.update(method.to_ascii_uppercase().as_bytes());
    mac.update(path_with_query.as_bytes());
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

impl SumsubClient {
    pub fn new(cfg: &SumsubConfig, timeout: Duration) -> Result<Self, IntegrationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegrationError::Setup(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            app_token: cfg.app_token.clone(),
            secret_key: cfg.secret_key.clone(),
            level_name: cfg.level_name.clone(),
            token_ttl_secs: cfg.token_ttl_secs,
        })
    }

    /// `base_url` plus `/resources/...` segments, each percent-encoded as a path segment.
    fn resource_url(&self, segments: &[&str]) -> Result<Url, IntegrationError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| IntegrationError::Setup(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| IntegrationError::Setup("sumsub base url cannot carry a path".into()))?
            .pop_if_empty()
            .push("resources")
            .extend(segments);
        Ok(url)
    }

    async fn signed(&self, method: Method, url: Url) -> Result<reqwest::Response, IntegrationError> {
        let ts = chrono::Utc::now().timestamp();
        let path_with_query = &url[Position::BeforePath..];
        let sig = sign(&self.secret_key, ts, method.as_str(), path_with_query, b"")?;
        debug!(%method, path = %path_with_query, "sumsub request");
        let resp = self
            .http
            .request(method, url.clone())
            .header("Accept", "application/json")
            .header("X-App-Token", &self.app_token)
            .header("X-App-Access-Ts", ts.to_string())
            .header("X-App-Access-Sig", sig)
            .send()
            .await?;
        Ok(resp)
    }
}

#[async_trait]
impl KycProvider for SumsubClient {
    fn default_level(&self) -> &str {
        &self.level_name
    }

    fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    #[instrument(skip(self))]
    async fn access_token(&self, user_id: &str, level_name: &str) -> Result<AccessToken, IntegrationError> {
        let mut url = self.resource_url(&["accessTokens"])?;
        url.query_pairs_mut()
            .append_pair("userId", user_id)
            .append_pair("levelName", level_name)
            .append_pair("ttlInSecs", &self.token_ttl_secs.to_string());
        let resp = self.signed(Method::POST, url).await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let body: AccessTokenBody = resp.json().await?;
        Ok(AccessToken { token: body.token, user_id: body.user_id })
    }

    #[instrument(skip(self))]
    async fn applicant_review(&self, user_id: &str) -> Result<Option<ApplicantReview>, IntegrationError> {
        let selector = format!("-;externalUserId={user_id}");
        let url = self.resource_url(&["applicants", &selector, "one"])?;
        let resp = self.signed(Method::GET, url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let body: ApplicantBody = resp.json().await?;
        let review = body.review.unwrap_or(ReviewBody { review_status: None, review_result: None });
        let result = review.review_result;
        Ok(Some(ApplicantReview {
            applicant_id: body.id,
            review_status: review.review_status,
            review_answer: result.as_ref().and_then(|r| r.review_answer.clone()),
            reject_type: result.and_then(|r| r.review_reject_type),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Request,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    const SECRET: &str = "test-secret";

    #[test]
    fn signature_matches_reference_vector() {
        let sig = sign(
            SECRET,
            1_700_000_000,
            "post",
            "/resources/accessTokens?userId=user-1&levelName=basic-kyc-level&ttlInSecs=600",
            b"",
        )
        .unwrap();
        assert_eq!(sig, "f2f8079974db3157adfcf3d8ad0eb7da49b4d2a1e925a8fe10d7455582f270e5");

        let sig = sign(SECRET, 1_700_000_000, "GET", "/resources/applicants/-;externalUserId=user-1/one", b"").unwrap();
        assert_eq!(sig, "008525308cbd143ea85e85fba9eeddf226d48421d7d4dc296efb67dd49e1f7f6");
    }

    #[test]
    fn signature_covers_body() {
        let a = sign(SECRET, 1, "POST", "/x", b"{}").unwrap();
        let b = sign(SECRET, 1, "POST", "/x", b"").unwrap();
        assert_ne!(a, b);
    }

    /// Check the three auth headers the way the real API does.
    fn verify(headers: &HeaderMap, method: &str, path_with_query: &str) -> bool {
        let get = |k: &str| headers.get(k).and_then(|v| v.to_str().ok()).map(str::to_string);
        let (Some(token), Some(ts), Some(sig)) = (get("x-app-token"), get("x-app-access-ts"), get("x-app-access-sig")) else {
            return false;
        };
        let Ok(ts) = ts.parse::<i64>() else { return false };
        token == "app-token" && sign(SECRET, ts, method, path_with_query, b"").ok() == Some(sig)
    }

    async fn fake_sumsub() -> String {
        let app = Router::new()
            .route(
                "/resources/accessTokens",
                post(|req: Request| async move {
                    let pq = req.uri().path_and_query().map(|p| p.as_str().to_string()).unwrap_or_default();
                    if !verify(req.headers(), "POST", &pq) {
                        return (AxumStatus::UNAUTHORIZED, Json(json!({"description": "bad sig"})));
                    }
                    (AxumStatus::OK, Json(json!({"token": "act-123", "userId": "user-1"})))
                }),
            )
            .route(
                "/resources/applicants/:selector/one",
                get(|req: Request| async move {
                    let pq = req.uri().path_and_query().map(|p| p.as_str().to_string()).unwrap_or_default();
                    if !verify(req.headers(), "GET", &pq) {
                        return (AxumStatus::UNAUTHORIZED, Json(json!({"description": "bad sig"})));
                    }
                    if pq.contains("externalUserId=ghost") {
                        return (AxumStatus::NOT_FOUND, Json(json!({"description": "Applicant not found", "code": 404})));
                    }
                    (
                        AxumStatus::OK,
                        Json(json!({
                            "id": "app-42",
                            "review": {"reviewStatus": "completed", "reviewResult": {"reviewAnswer": "RED", "reviewRejectType": "RETRY"}}
                        })),
                    )
                }),
            );
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, secret: &str) -> SumsubClient {
        let cfg = SumsubConfig {
            app_token: "app-token".into(),
            secret_key: secret.into(),
            base_url,
            level_name: "basic-kyc-level".into(),
            token_ttl_secs: 600,
        };
        SumsubClient::new(&cfg, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn access_token_round_trip() {
        let c = client(fake_sumsub().await, SECRET);
        let tok = c.access_token("user-1", "basic-kyc-level").await.unwrap();
        assert_eq!(tok.token, "act-123");
        assert_eq!(tok.user_id, "user-1");
    }

    #[tokio::test]
    async fn wrong_secret_surfaces_status() {
        let c = client(fake_sumsub().await, "other-secret");
        let err = c.access_token("user-1", "basic-kyc-level").await.unwrap_err();
        assert!(matches!(err, IntegrationError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn applicant_review_parsed() {
        let c = client(fake_sumsub().await, SECRET);
        let review = c.applicant_review("user-1").await.unwrap().expect("applicant");
        assert_eq!(review.applicant_id, "app-42");
        assert_eq!(review.review_status.as_deref(), Some("completed"));
        assert_eq!(review.review_answer.as_deref(), Some("RED"));
        assert_eq!(review.reject_type.as_deref(), Some("RETRY"));
    }

    #[test]
    fn resource_urls_are_encoded_segments() {
        let c = client("https://api.sumsub.com/".into(), SECRET);
        let url = c.resource_url(&["applicants", "-;externalUserId=a b/c", "one"]).unwrap();
        assert_eq!(&url[Position::BeforePath..], "/resources/applicants/-;externalUserId=a%20b%2Fc/one");
    }

    #[tokio::test]
    async fn unknown_applicant_is_none() {
        let c = client(fake_sumsub().await, SECRET);
        assert!(c.applicant_review("ghost").await.unwrap().is_none());
    }
}
