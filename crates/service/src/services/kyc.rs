//! KYC access tokens and verification status, backed by the KYC provider.

use std::sync::Arc;
use std::time::Duration;

use common::metrics;
use models::status::KycStatus;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::integrations::{ApplicantReview, KycProvider};
use crate::repository::UserRepository;
use crate::validation::Validator;

pub const PROVIDER_NAME: &str = "sumsub";
pub const MAX_USER_ID_LEN: usize = 128;
pub const STATUS_CACHE_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest {
    pub user_id: Option<String>,
    pub level_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycToken {
    pub token: String,
    pub user_id: String,
    pub level_name: String,
    pub expires_in_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatusView {
    pub user_id: String,
    pub status: KycStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_answer: Option<String>,
}

/// Collapse the provider's review state into our status column.
///
/// `None` means the provider has never seen this user.
pub fn map_review(review: Option<&ApplicantReview>) -> KycStatus {
    let Some(review) = review else { return KycStatus::NotStarted };
    match (review.review_status.as_deref(), review.review_answer.as_deref(), review.reject_type.as_deref()) {
        (Some("init"), _, _) => KycStatus::NotStarted,
        (Some("completed"), Some("GREEN"), _) => KycStatus::Approved,
        (Some("completed"), Some("RED"), Some("RETRY")) => KycStatus::ActionRequired,
        (Some("completed"), Some("RED"), _) => KycStatus::Rejected,
        _ => KycStatus::Pending,
    }
}

pub struct KycService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    provider: Option<Arc<dyn KycProvider>>,
    cache: Cache<String, KycStatusView>,
}

impl<R: UserRepository + ?Sized> KycService<R> {
    pub fn new(repo: Arc<R>, provider: Option<Arc<dyn KycProvider>>) -> Self {
        Self::with_cache_ttl(repo, provider, STATUS_CACHE_TTL)
    }

    pub fn with_cache_ttl(repo: Arc<R>, provider: Option<Arc<dyn KycProvider>>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(10_000).time_to_live(ttl).build();
        Self { repo, provider, cache }
    }

    pub fn configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn KycProvider>, ServiceError> {
        self.provider.as_ref().ok_or(ServiceError::NotConfigured("kyc provider"))
    }

    fn user_id(raw: Option<&str>) -> Result<String, ServiceError> {
        let mut v = Validator::new();
        let id = v.required("userId", raw, 1, MAX_USER_ID_LEN);
        v.finish()?;
        id.ok_or_else(|| ServiceError::invalid("userId", "is required"))
    }

    #[instrument(skip_all)]
    pub async fn access_token(&self, req: AccessTokenRequest) -> Result<KycToken, ServiceError> {
        let provider = self.provider()?;
        let user_id = Self::user_id(req.user_id.as_deref())?;
        let mut v = Validator::new();
        let level = v.optional("levelName", req.level_name.as_deref(), 128);
        v.finish()?;
        let level = level.unwrap_or_else(|| provider.default_level().to_string());

        let result = provider.access_token(&user_id, &level).await;
        metrics::kyc_call("access_token", result.is_ok());
        let token = result?;
        info!(user_id = %user_id, level = %level, "kyc_access_token_issued");
        Ok(KycToken {
            token: token.token,
            user_id: token.user_id,
            level_name: level,
            expires_in_secs: provider.token_ttl_secs(),
        })
    }

    /// Current status for a user, cached for [`STATUS_CACHE_TTL`].
    #[instrument(skip(self))]
    pub async fn status(&self, user_id: &str) -> Result<KycStatusView, ServiceError> {
        let provider = self.provider()?;
        let user_id = Self::user_id(Some(user_id))?;
        if let Some(hit) = self.cache.get(&user_id).await {
            debug!("kyc status cache hit");
            return Ok(hit);
        }

        let result = provider.applicant_review(&user_id).await;
        metrics::kyc_call("status", result.is_ok());
        let review = result?;
        let status = map_review(review.as_ref());
        let view = KycStatusView {
            user_id: user_id.clone(),
            status,
            applicant_id: review.as_ref().map(|r| r.applicant_id.clone()),
            review_status: review.as_ref().and_then(|r| r.review_status.clone()),
            review_answer: review.as_ref().and_then(|r| r.review_answer.clone()),
        };

        self.sync_user(&view).await;
        self.cache.insert(user_id, view.clone()).await;
        Ok(view)
    }

    /// Mirror the status onto the local user row. Failures are only logged.
    async fn sync_user(&self, view: &KycStatusView) {
        let user = match self.repo.find_user(&view.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                metrics::side_effect_failed("kyc_sync");
                warn!(error = %e, "kyc user lookup failed");
                return;
            }
        };
        let unchanged = user.kyc_status == view.status.as_str()
            && (view.applicant_id.is_none() || user.kyc_applicant_id == view.applicant_id);
        if unchanged {
            return;
        }
        match self.repo.set_kyc_status(user.id, view.status, view.applicant_id.as_deref()).await {
            Ok(_) => info!(user = %user.id, status = %view.status, "kyc_status_synced"),
            Err(e) => {
                metrics::side_effect_failed("kyc_sync");
                warn!(error = %e, "kyc status sync failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::mock::MockKycProvider;
    use crate::repository::mock::MockStore;
    use std::sync::atomic::Ordering;

    fn review(status: &str, answer: Option<&str>, reject: Option<&str>) -> ApplicantReview {
        ApplicantReview {
            applicant_id: "app-1".into(),
            review_status: Some(status.into()),
            review_answer: answer.map(Into::into),
            reject_type: reject.map(Into::into),
        }
    }

    #[test]
    fn review_mapping() {
        assert_eq!(map_review(None), KycStatus::NotStarted);
        assert_eq!(map_review(Some(&review("init", None, None))), KycStatus::NotStarted);
        assert_eq!(map_review(Some(&review("completed", Some("GREEN"), None))), KycStatus::Approved);
        assert_eq!(map_review(Some(&review("completed", Some("RED"), Some("RETRY")))), KycStatus::ActionRequired);
        assert_eq!(map_review(Some(&review("completed", Some("RED"), Some("FINAL")))), KycStatus::Rejected);
        assert_eq!(map_review(Some(&review("completed", Some("RED"), None))), KycStatus::Rejected);
        assert_eq!(map_review(Some(&review("pending", None, None))), KycStatus::Pending);
        assert_eq!(map_review(Some(&review("onHold", None, None))), KycStatus::Pending);
    }

    #[tokio::test]
    async fn unconfigured_provider_wins_over_validation() {
        let svc = KycService::new(Arc::new(MockStore::default()), None);
        assert!(!svc.configured());
        let err = svc.access_token(AccessTokenRequest::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured(_)));
        assert!(matches!(svc.status("u1").await.unwrap_err(), ServiceError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn access_token_validates_user_id() {
        let provider: Arc<dyn KycProvider> = Arc::new(MockKycProvider::default());
        let svc = KycService::new(Arc::new(MockStore::default()), Some(provider));
        for bad in [None, Some("   ".to_string()), Some("x".repeat(129))] {
            let err = svc.access_token(AccessTokenRequest { user_id: bad, level_name: None }).await.unwrap_err();
            let ServiceError::Invalid(details) = err else { panic!("expected invalid") };
            assert_eq!(details[0].field, "userId");
        }
        let tok = svc
            .access_token(AccessTokenRequest { user_id: Some("user_1".into()), level_name: None })
            .await
            .unwrap();
        assert_eq!(tok.token, "tok-user_1-basic-kyc-level");
        assert_eq!(tok.level_name, "basic-kyc-level");
        assert_eq!(tok.expires_in_secs, 600);
    }

    #[tokio::test]
    async fn provider_failure_is_upstream_error() {
        let mock = MockKycProvider::default();
        mock.fail.store(true, Ordering::SeqCst);
        let svc = KycService::new(Arc::new(MockStore::default()), Some(Arc::new(mock) as Arc<dyn KycProvider>));
        let err = svc
            .access_token(AccessTokenRequest { user_id: Some("user_1".into()), level_name: Some("custom".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
    }

    #[tokio::test]
    async fn status_is_cached_and_synced_to_user() {
        let store = Arc::new(MockStore::default());
        let user = store.insert_user("ada@example.com", Some("user_ada"));
        let mock = Arc::new(MockKycProvider::default().with_review("user_ada", review("completed", Some("GREEN"), None)));
        let svc = KycService::new(store.clone(), Some(mock.clone() as Arc<dyn KycProvider>));

        let first = svc.status("user_ada").await.unwrap();
        assert_eq!(first.status, KycStatus::Approved);
        assert_eq!(first.applicant_id.as_deref(), Some("app-1"));
        let second = svc.status("user_ada").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.review_calls.load(Ordering::SeqCst), 1);

        let row = store.users.lock().unwrap().iter().find(|u| u.id == user.id).cloned().unwrap();
        assert_eq!(row.kyc_status, "approved");
        assert_eq!(row.kyc_applicant_id.as_deref(), Some("app-1"));
    }

    #[tokio::test]
    async fn unknown_applicant_is_not_started() {
        let mock: Arc<dyn KycProvider> = Arc::new(MockKycProvider::default());
        let svc = KycService::with_cache_ttl(Arc::new(MockStore::default()), Some(mock), Duration::from_millis(1));
        let view = svc.status("nobody").await.unwrap();
        assert_eq!(view.status, KycStatus::NotStarted);
        assert!(view.applicant_id.is_none());
    }
}
