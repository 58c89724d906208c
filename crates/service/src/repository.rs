//! Persistence seams used by the services.
//!
//! Records are the `models` entities themselves; they already serialize in
//! the camelCase shape the API returns.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use models::deal::{DealUpdate, NewDeal};
use models::early_access_submission::NewSubmission;
use models::status::{KycStatus, SubscriberStatus};
use models::user::ProfileUpdate;
use models::{
    deal, early_access_submission, newsletter_subscriber, payment_method, transfer, user, user_document,
    user_investment, wallet,
};

use crate::errors::ServiceError;
use crate::pagination::{Paged, Pagination};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub active_subscribers: u64,
    pub early_access_submissions: u64,
    pub open_deals: u64,
    pub confirmed_investment_cents: i64,
}

/// A user with everything hanging off it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub user: user::Model,
    pub wallets: Vec<wallet::Model>,
    pub investments: Vec<user_investment::Model>,
    pub transfers: Vec<transfer::Model>,
    pub documents: Vec<user_document::Model>,
    pub payment_methods: Vec<payment_method::Model>,
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn find_subscriber(&self, email: &str) -> Result<Option<newsletter_subscriber::Model>, ServiceError>;
    async fn create_subscriber(&self, email: &str, source: Option<&str>) -> Result<newsletter_subscriber::Model, ServiceError>;
    async fn set_subscriber_status(&self, id: Uuid, status: SubscriberStatus) -> Result<newsletter_subscriber::Model, ServiceError>;
    async fn list_subscribers(&self, page: Pagination) -> Result<Paged<newsletter_subscriber::Model>, ServiceError>;
}

#[async_trait]
pub trait EarlyAccessRepository: Send + Sync {
    async fn find_submission(&self, email: &str) -> Result<Option<early_access_submission::Model>, ServiceError>;
    async fn create_submission(&self, input: NewSubmission) -> Result<early_access_submission::Model, ServiceError>;
    async fn mark_crm_synced(&self, id: Uuid) -> Result<(), ServiceError>;
    /// Newest first.
    async fn list_submissions(&self, page: Pagination) -> Result<Paged<early_access_submission::Model>, ServiceError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Match on the auth-provider id, or on our UUID when `key` parses as one.
    async fn find_user(&self, key: &str) -> Result<Option<user::Model>, ServiceError>;
    async fn set_kyc_status(&self, id: Uuid, status: KycStatus, applicant_id: Option<&str>) -> Result<user::Model, ServiceError>;
    async fn update_user(&self, id: Uuid, update: ProfileUpdate) -> Result<user::Model, ServiceError>;
    async fn list_users(&self, page: Pagination) -> Result<Paged<user::Model>, ServiceError>;
    async fn user_detail(&self, id: Uuid) -> Result<Option<UserDetail>, ServiceError>;
}

#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Status `open`, newest first.
    async fn list_open_deals(&self) -> Result<Vec<deal::Model>, ServiceError>;
    async fn find_deal(&self, id: Uuid) -> Result<Option<deal::Model>, ServiceError>;
    async fn find_deal_by_slug(&self, slug: &str) -> Result<Option<deal::Model>, ServiceError>;
    async fn create_deal(&self, input: NewDeal) -> Result<deal::Model, ServiceError>;
    async fn update_deal(&self, id: Uuid, update: DealUpdate) -> Result<deal::Model, ServiceError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn stats(&self) -> Result<AdminStats, ServiceError>;
}

/// Everything the HTTP layer needs from storage.
pub trait Repository:
    HealthProbe + NewsletterRepository + EarlyAccessRepository + UserRepository + DealRepository + StatsRepository
{
}

impl<T> Repository for T where
    T: HealthProbe + NewsletterRepository + EarlyAccessRepository + UserRepository + DealRepository + StatsRepository
{
}

/// In-memory store for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use models::status::{DealStatus, InvestmentStatus};
    use sea_orm::prelude::DateTimeWithTimeZone;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    fn now() -> DateTimeWithTimeZone {
        Utc::now().into()
    }

    fn page_of<T: Clone>(rows: &[T], page: Pagination) -> Paged<T> {
        let (idx, per_page) = page.normalize();
        let items = rows.iter().skip((idx * per_page) as usize).take(per_page as usize).cloned().collect();
        Paged::new(items, page, rows.len() as u64)
    }

    #[derive(Default)]
    pub struct MockStore {
        pub users: Mutex<Vec<user::Model>>,
        pub subscribers: Mutex<Vec<newsletter_subscriber::Model>>,
        pub submissions: Mutex<Vec<early_access_submission::Model>>,
        pub deals: Mutex<Vec<deal::Model>>,
        pub wallets: Mutex<Vec<wallet::Model>>,
        pub transfers: Mutex<Vec<transfer::Model>>,
        pub payment_methods: Mutex<Vec<payment_method::Model>>,
        pub documents: Mutex<Vec<user_document::Model>>,
        pub investments: Mutex<Vec<user_investment::Model>>,
        /// Make `ping` fail, as if the database were gone.
        pub fail_ping: AtomicBool,
    }

    impl MockStore {
        pub fn insert_user(&self, email: &str, external_id: Option<&str>) -> user::Model {
            let ts = now();
            let u = user::Model {
                id: Uuid::new_v4(),
                external_id: external_id.map(str::to_string),
                email: email.to_string(),
                first_name: None,
                last_name: None,
                country: None,
                investor_type: None,
                kyc_status: KycStatus::NotStarted.as_str().to_string(),
                kyc_applicant_id: None,
                created_at: ts,
                updated_at: ts,
            };
            self.users.lock().unwrap().push(u.clone());
            u
        }

        pub fn insert_wallet(&self, user_id: Uuid, address: &str) -> wallet::Model {
            let w = wallet::Model {
                id: Uuid::new_v4(),
                user_id,
                address: address.to_string(),
                network: "ethereum".into(),
                label: None,
                is_primary: true,
                created_at: now(),
            };
            self.wallets.lock().unwrap().push(w.clone());
            w
        }

        pub fn insert_investment(&self, user_id: Uuid, deal_id: Uuid, amount_cents: i64, status: &str) -> user_investment::Model {
            let inv = user_investment::Model {
                id: Uuid::new_v4(),
                user_id,
                deal_id,
                amount_cents,
                token_amount: amount_cents / 100,
                status: status.to_string(),
                created_at: now(),
            };
            self.investments.lock().unwrap().push(inv.clone());
            inv
        }

        pub fn subscriber(&self, email: &str) -> Option<newsletter_subscriber::Model> {
            self.subscribers.lock().unwrap().iter().find(|s| s.email == email).cloned()
        }

        pub fn submission(&self, email: &str) -> Option<early_access_submission::Model> {
            self.submissions.lock().unwrap().iter().find(|s| s.email == email).cloned()
        }
    }

    #[async_trait]
    impl HealthProbe for MockStore {
        async fn ping(&self) -> Result<(), ServiceError> {
            if self.fail_ping.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl NewsletterRepository for MockStore {
        async fn find_subscriber(&self, email: &str) -> Result<Option<newsletter_subscriber::Model>, ServiceError> {
            Ok(self.subscriber(email))
        }

        async fn create_subscriber(&self, email: &str, source: Option<&str>) -> Result<newsletter_subscriber::Model, ServiceError> {
            let mut rows = self.subscribers.lock().unwrap();
            if rows.iter().any(|s| s.email == email) {
                return Err(ServiceError::Db("duplicate key value violates unique constraint".into()));
            }
            let s = newsletter_subscriber::Model {
                id: Uuid::new_v4(),
                email: email.to_string(),
                status: SubscriberStatus::Active.as_str().to_string(),
                source: source.map(str::to_string),
                subscribed_at: now(),
                unsubscribed_at: None,
            };
            rows.push(s.clone());
            Ok(s)
        }

        async fn set_subscriber_status(&self, id: Uuid, status: SubscriberStatus) -> Result<newsletter_subscriber::Model, ServiceError> {
            let mut rows = self.subscribers.lock().unwrap();
            let row = rows.iter_mut().find(|s| s.id == id).ok_or_else(|| ServiceError::not_found("subscriber"))?;
            row.status = status.as_str().to_string();
            match status {
                SubscriberStatus::Active => {
                    row.subscribed_at = now();
                    row.unsubscribed_at = None;
                }
                SubscriberStatus::Unsubscribed => row.unsubscribed_at = Some(now()),
            }
            Ok(row.clone())
        }

        async fn list_subscribers(&self, page: Pagination) -> Result<Paged<newsletter_subscriber::Model>, ServiceError> {
            let mut rows = self.subscribers.lock().unwrap().clone();
            rows.reverse();
            Ok(page_of(&rows, page))
        }
    }

    #[async_trait]
    impl EarlyAccessRepository for MockStore {
        async fn find_submission(&self, email: &str) -> Result<Option<early_access_submission::Model>, ServiceError> {
            Ok(self.submission(email))
        }

        async fn create_submission(&self, input: NewSubmission) -> Result<early_access_submission::Model, ServiceError> {
            let row = early_access_submission::Model {
                id: Uuid::new_v4(),
                full_name: input.full_name,
                email: input.email,
                phone: input.phone,
                country: input.country,
                investor_type: input.investor_type,
                investment_range: input.investment_range,
                interests: serde_json::json!(input.interests),
                message: input.message,
                crm_synced: false,
                created_at: now(),
            };
            self.submissions.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn mark_crm_synced(&self, id: Uuid) -> Result<(), ServiceError> {
            let mut rows = self.submissions.lock().unwrap();
            let row = rows.iter_mut().find(|s| s.id == id).ok_or_else(|| ServiceError::not_found("early access submission"))?;
            row.crm_synced = true;
            Ok(())
        }

        async fn list_submissions(&self, page: Pagination) -> Result<Paged<early_access_submission::Model>, ServiceError> {
            let mut rows = self.submissions.lock().unwrap().clone();
            rows.reverse();
            Ok(page_of(&rows, page))
        }
    }

    #[async_trait]
    impl UserRepository for MockStore {
        async fn find_user(&self, key: &str) -> Result<Option<user::Model>, ServiceError> {
            let id = Uuid::parse_str(key).ok();
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.external_id.as_deref() == Some(key) || Some(u.id) == id)
                .cloned())
        }

        async fn set_kyc_status(&self, id: Uuid, status: KycStatus, applicant_id: Option<&str>) -> Result<user::Model, ServiceError> {
            let mut rows = self.users.lock().unwrap();
            let u = rows.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
            u.kyc_status = status.as_str().to_string();
            if let Some(a) = applicant_id {
                u.kyc_applicant_id = Some(a.to_string());
            }
            u.updated_at = now();
            Ok(u.clone())
        }

        async fn update_user(&self, id: Uuid, update: ProfileUpdate) -> Result<user::Model, ServiceError> {
            let mut rows = self.users.lock().unwrap();
            let u = rows.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
            if let Some(v) = update.first_name { u.first_name = Some(v); }
            if let Some(v) = update.last_name { u.last_name = Some(v); }
            if let Some(v) = update.country { u.country = Some(v); }
            if let Some(v) = update.investor_type { u.investor_type = Some(v); }
            if let Some(v) = update.kyc_status { u.kyc_status = v.as_str().to_string(); }
            u.updated_at = now();
            Ok(u.clone())
        }

        async fn list_users(&self, page: Pagination) -> Result<Paged<user::Model>, ServiceError> {
            let mut rows = self.users.lock().unwrap().clone();
            rows.reverse();
            Ok(page_of(&rows, page))
        }

        async fn user_detail(&self, id: Uuid) -> Result<Option<UserDetail>, ServiceError> {
            let Some(user) = self.users.lock().unwrap().iter().find(|u| u.id == id).cloned() else {
                return Ok(None);
            };
            Ok(Some(UserDetail {
                user,
                wallets: self.wallets.lock().unwrap().iter().filter(|w| w.user_id == id).cloned().collect(),
                investments: self.investments.lock().unwrap().iter().filter(|i| i.user_id == id).cloned().collect(),
                transfers: self.transfers.lock().unwrap().iter().filter(|t| t.user_id == id).cloned().collect(),
                documents: self.documents.lock().unwrap().iter().filter(|d| d.user_id == id).cloned().collect(),
                payment_methods: self.payment_methods.lock().unwrap().iter().filter(|p| p.user_id == id).cloned().collect(),
            }))
        }
    }

    #[async_trait]
    impl DealRepository for MockStore {
        async fn list_open_deals(&self) -> Result<Vec<deal::Model>, ServiceError> {
            let mut rows: Vec<_> = self
                .deals
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.status == DealStatus::Open.as_str())
                .cloned()
                .collect();
            rows.reverse();
            Ok(rows)
        }

        async fn find_deal(&self, id: Uuid) -> Result<Option<deal::Model>, ServiceError> {
            Ok(self.deals.lock().unwrap().iter().find(|d| d.id == id).cloned())
        }

        async fn find_deal_by_slug(&self, slug: &str) -> Result<Option<deal::Model>, ServiceError> {
            Ok(self.deals.lock().unwrap().iter().find(|d| d.slug == slug).cloned())
        }

        async fn create_deal(&self, input: NewDeal) -> Result<deal::Model, ServiceError> {
            deal::validate_slug(&input.slug)?;
            let mut rows = self.deals.lock().unwrap();
            if rows.iter().any(|d| d.slug == input.slug) {
                return Err(ServiceError::Db("duplicate key value violates unique constraint \"deals_slug_key\"".into()));
            }
            let ts = now();
            let d = deal::Model {
                id: Uuid::new_v4(),
                slug: input.slug,
                title: input.title,
                asset_class: input.asset_class,
                jurisdiction: input.jurisdiction,
                target_amount_cents: input.target_amount_cents,
                raised_amount_cents: 0,
                min_investment_cents: input.min_investment_cents,
                expected_yield_bps: input.expected_yield_bps,
                status: input.status.as_str().to_string(),
                description: input.description,
                created_at: ts,
                updated_at: ts,
            };
            rows.push(d.clone());
            Ok(d)
        }

        async fn update_deal(&self, id: Uuid, update: DealUpdate) -> Result<deal::Model, ServiceError> {
            let mut rows = self.deals.lock().unwrap();
            let d = rows.iter_mut().find(|d| d.id == id).ok_or_else(|| ServiceError::not_found("deal"))?;
            if let Some(v) = update.title { d.title = v; }
            if let Some(v) = update.asset_class { d.asset_class = v; }
            if let Some(v) = update.jurisdiction { d.jurisdiction = v; }
            if let Some(v) = update.target_amount_cents { d.target_amount_cents = v; }
            if let Some(v) = update.raised_amount_cents { d.raised_amount_cents = v; }
            if let Some(v) = update.min_investment_cents { d.min_investment_cents = v; }
            if let Some(v) = update.expected_yield_bps { d.expected_yield_bps = Some(v); }
            if let Some(v) = update.status { d.status = v.as_str().to_string(); }
            if let Some(v) = update.description { d.description = Some(v); }
            d.updated_at = now();
            Ok(d.clone())
        }
    }

    #[async_trait]
    impl StatsRepository for MockStore {
        async fn stats(&self) -> Result<AdminStats, ServiceError> {
            Ok(AdminStats {
                users: self.users.lock().unwrap().len() as u64,
                active_subscribers: self.subscribers.lock().unwrap().iter().filter(|s| s.is_active()).count() as u64,
                early_access_submissions: self.submissions.lock().unwrap().len() as u64,
                open_deals: self.deals.lock().unwrap().iter().filter(|d| d.status == DealStatus::Open.as_str()).count() as u64,
                confirmed_investment_cents: self
                    .investments
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|i| i.status == InvestmentStatus::Confirmed.as_str())
                    .map(|i| i.amount_cents)
                    .sum(),
            })
        }
    }
}
