//! Outbound integrations: KYC provider, transactional email, CRM relay.
//!
//! Each one is a trait so handlers and services can be exercised without
//! the network; `mock` holds the in-memory doubles.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod sumsub;
pub mod resend;
pub mod n8n;
pub mod templates;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("cannot decode response: {0}")]
    Decode(String),
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for IntegrationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IntegrationError::Decode(e.to_string())
        } else {
            IntegrationError::Transport(e.to_string())
        }
    }
}

/// Read a non-2xx response into [`IntegrationError::Status`], keeping at most 512 bytes of body.
pub(crate) async fn status_error(resp: reqwest::Response) -> IntegrationError {
    let status = resp.status().as_u16();
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > 512 {
        let mut cut = 512;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    IntegrationError::Status { status, body }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Returns the provider's message id.
    async fn send(&self, message: EmailMessage) -> Result<String, IntegrationError>;
}

#[async_trait]
pub trait CrmRelay: Send + Sync {
    async fn relay(&self, event: &serde_json::Value) -> Result<(), IntegrationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub user_id: String,
}

/// Review state of an applicant as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantReview {
    pub applicant_id: String,
    pub review_status: Option<String>,
    pub review_answer: Option<String>,
    pub reject_type: Option<String>,
}

#[async_trait]
pub trait KycProvider: Send + Sync {
    fn default_level(&self) -> &str;

    fn token_ttl_secs(&self) -> u64;

    async fn access_token(&self, user_id: &str, level_name: &str) -> Result<AccessToken, IntegrationError>;

    /// `Ok(None)` when the provider has no applicant for this user.
    async fn applicant_review(&self, user_id: &str) -> Result<Option<ApplicantReview>, IntegrationError>;
}

/// In-memory doubles that record calls.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockEmailSender {
        pub sent: Mutex<Vec<EmailMessage>>,
        pub fail: AtomicBool,
    }

    impl MockEmailSender {
        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailSender for MockEmailSender {
        async fn send(&self, message: EmailMessage) -> Result<String, IntegrationError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(IntegrationError::Status { status: 500, body: "mock failure".into() });
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(message);
            Ok(format!("mock-{}", sent.len()))
        }
    }

    #[derive(Default)]
    pub struct MockCrmRelay {
        pub events: Mutex<Vec<serde_json::Value>>,
        pub fail: AtomicBool,
    }

    impl MockCrmRelay {
        pub fn events(&self) -> Vec<serde_json::Value> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CrmRelay for MockCrmRelay {
        async fn relay(&self, event: &serde_json::Value) -> Result<(), IntegrationError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(IntegrationError::Transport("mock failure".into()));
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    /// KYC double; reviews are keyed by external user id.
    #[derive(Default)]
    pub struct MockKycProvider {
        pub reviews: Mutex<HashMap<String, ApplicantReview>>,
        pub fail: AtomicBool,
        pub review_calls: AtomicUsize,
    }

    impl MockKycProvider {
        pub fn with_review(self, user_id: &str, review: ApplicantReview) -> Self {
            self.reviews.lock().unwrap().insert(user_id.to_string(), review);
            self
        }
    }

    #[async_trait]
    impl KycProvider for MockKycProvider {
        fn default_level(&self) -> &str { "basic-kyc-level" }

        fn token_ttl_secs(&self) -> u64 { 600 }

        async fn access_token(&self, user_id: &str, level_name: &str) -> Result<AccessToken, IntegrationError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(IntegrationError::Status { status: 401, body: "bad signature".into() });
            }
            Ok(AccessToken { token: format!("tok-{user_id}-{level_name}"), user_id: user_id.to_string() })
        }

        async fn applicant_review(&self, user_id: &str) -> Result<Option<ApplicantReview>, IntegrationError> {
            self.review_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(IntegrationError::Transport("mock failure".into()));
            }
            Ok(self.reviews.lock().unwrap().get(user_id).cloned())
        }
    }
}
