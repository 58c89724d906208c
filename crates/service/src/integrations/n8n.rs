//! CRM relay: posts lead events to an n8n webhook.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use super::{status_error, CrmRelay, IntegrationError};

pub struct WebhookRelay {
    http: reqwest::Client,
    url: String,
}

impl WebhookRelay {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, IntegrationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegrationError::Setup(e.to_string()))?;
        Ok(Self { http, url: url.to_string() })
    }
}

#[async_trait]
impl CrmRelay for WebhookRelay {
    #[instrument(skip_all)]
    async fn relay(&self, event: &serde_json::Value) -> Result<(), IntegrationError> {
        let resp = self.http.post(&self.url).json(event).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(())
    }
}
