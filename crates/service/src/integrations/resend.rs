//! Transactional email over the Resend HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use configs::EmailConfig;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{status_error, EmailMessage, EmailSender, IntegrationError};

pub struct ResendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl ResendClient {
    pub fn new(cfg: &EmailConfig, timeout: Duration) -> Result<Self, IntegrationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegrationError::Setup(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            from: cfg.from.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send(&self, message: EmailMessage) -> Result<String, IntegrationError> {
        let body = SendBody { from: &self.from, to: [&message.to], subject: &message.subject, html: &message.html };
        let resp = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let parsed: SendResponse = resp.json().await?;
        Ok(parsed.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn fake_resend() -> String {
        let app = Router::new().route(
            "/emails",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default();
                if auth != "Bearer re_test" {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"message": "invalid key"})));
                }
                assert_eq!(body["to"], json!(["alice@example.com"]));
                assert_eq!(body["from"], "Fragma <hello@fragma.test>");
                (StatusCode::OK, Json(json!({"id": "email-1"})))
            }),
        );
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, api_key: &str) -> ResendClient {
        let cfg = EmailConfig { api_key: api_key.into(), from: "Fragma <hello@fragma.test>".into(), base_url };
        ResendClient::new(&cfg, Duration::from_secs(5)).unwrap()
    }

    fn message() -> EmailMessage {
        EmailMessage { to: "alice@example.com".into(), subject: "hi".into(), html: "<p>hi</p>".into() }
    }

    #[tokio::test]
    async fn send_returns_provider_id() {
        let c = client(fake_resend().await, "re_test");
        assert_eq!(c.send(message()).await.unwrap(), "email-1");
    }

    #[tokio::test]
    async fn rejected_key_is_status_error() {
        let c = client(fake_resend().await, "re_wrong");
        let err = c.send(message()).await.unwrap_err();
        assert!(matches!(err, IntegrationError::Status { status: 401, ref body } if body.contains("invalid key")));
    }
}
