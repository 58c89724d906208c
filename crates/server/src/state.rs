use std::sync::Arc;
use std::time::Duration;

use configs::AppConfig;
use service::integrations::n8n::WebhookRelay;
use service::integrations::resend::ResendClient;
use service::integrations::sumsub::SumsubClient;
use service::integrations::{CrmRelay, EmailSender, IntegrationError, KycProvider};
use service::repository::Repository;
use service::services::{
    admin::AdminService, deals::DealService, early_access::EarlyAccessService, health::HealthService,
    kyc::KycService, newsletter::NewsletterService,
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Optional third-party clients; `None` means the integration is not configured.
#[derive(Clone, Default)]
pub struct Integrations {
    pub email: Option<Arc<dyn EmailSender>>,
    pub crm: Option<Arc<dyn CrmRelay>>,
    pub kyc: Option<Arc<dyn KycProvider>>,
}

impl Integrations {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, IntegrationError> {
        let timeout = Duration::from_secs(cfg.http_client.timeout_secs);
        let email = match &cfg.email {
            Some(e) => Some(Arc::new(ResendClient::new(e, timeout)?) as Arc<dyn EmailSender>),
            None => None,
        };
        let crm = match &cfg.crm {
            Some(c) => Some(Arc::new(WebhookRelay::new(&c.webhook_url, timeout)?) as Arc<dyn CrmRelay>),
            None => None,
        };
        let kyc = match &cfg.sumsub {
            Some(s) => Some(Arc::new(SumsubClient::new(s, timeout)?) as Arc<dyn KycProvider>),
            None => None,
        };
        Ok(Self { email, crm, kyc })
    }
}

/// SHA-256 of the configured admin key; requests are compared digest to digest.
#[derive(Clone)]
pub struct AdminKey([u8; 32]);

impl AdminKey {
    pub fn new(key: &str) -> Self {
        Self(Sha256::digest(key.as_bytes()).into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let other: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        self.0.ct_eq(&other).into()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthService<dyn Repository>>,
    pub newsletter: Arc<NewsletterService<dyn Repository>>,
    pub early_access: Arc<EarlyAccessService<dyn Repository>>,
    pub kyc: Arc<KycService<dyn Repository>>,
    pub admin: Arc<AdminService<dyn Repository>>,
    pub deals: Arc<DealService<dyn Repository>>,
    pub admin_key: Option<AdminKey>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, integrations: Integrations, admin_key: Option<&str>) -> Self {
        Self {
            health: Arc::new(HealthService::new(repo.clone(), env!("CARGO_PKG_VERSION"))),
            newsletter: Arc::new(NewsletterService::new(repo.clone(), integrations.email.clone())),
            early_access: Arc::new(EarlyAccessService::new(repo.clone(), integrations.email, integrations.crm)),
            kyc: Arc::new(KycService::new(repo.clone(), integrations.kyc)),
            admin: Arc::new(AdminService::new(repo.clone())),
            deals: Arc::new(DealService::new(repo)),
            admin_key: admin_key.map(AdminKey::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdminKey;

    #[test]
    fn admin_key_compare() {
        let key = AdminKey::new("0123456789abcdef");
        assert!(key.matches("0123456789abcdef"));
        assert!(!key.matches("0123456789abcdeF"));
        assert!(!key.matches(""));
    }
}
