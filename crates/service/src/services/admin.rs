//! Back-office operations behind the admin key.

use std::sync::Arc;

use models::deal::{self, DealUpdate, NewDeal};
use models::status::{DealStatus, InvestorType, KycStatus};
use models::user::ProfileUpdate;
use models::{early_access_submission, newsletter_subscriber, user};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::{Paged, Pagination};
use crate::repository::{AdminStats, Repository, UserDetail};
use crate::validation::Validator;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub investor_type: Option<String>,
    pub kyc_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub asset_class: Option<String>,
    pub jurisdiction: Option<String>,
    pub target_amount_cents: Option<i64>,
    pub min_investment_cents: Option<i64>,
    pub expected_yield_bps: Option<i32>,
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealRequest {
    pub title: Option<String>,
    pub asset_class: Option<String>,
    pub jurisdiction: Option<String>,
    pub target_amount_cents: Option<i64>,
    pub raised_amount_cents: Option<i64>,
    pub min_investment_cents: Option<i64>,
    pub expected_yield_bps: Option<i32>,
    pub status: Option<String>,
    pub description: Option<String>,
}

fn names<T: Copy>(all: &[T], f: fn(T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(|t| f(*t)).collect()
}

impl UpdateUserRequest {
    fn validate(&self) -> Result<ProfileUpdate, ServiceError> {
        let mut v = Validator::new();
        let update = ProfileUpdate {
            first_name: v.optional("firstName", self.first_name.as_deref(), 80),
            last_name: v.optional("lastName", self.last_name.as_deref(), 80),
            country: present(&mut v, "country", self.country.as_deref(), 2, 64),
            investor_type: match self.investor_type.as_deref() {
                Some(t) => v
                    .one_of::<InvestorType>("investorType", Some(t), &names(InvestorType::ALL, InvestorType::as_str))
                    .map(|t| t.as_str().to_string()),
                None => None,
            },
            kyc_status: match self.kyc_status.as_deref() {
                Some(s) => v.one_of::<KycStatus>("kycStatus", Some(s), &names(KycStatus::ALL, KycStatus::as_str)),
                None => None,
            },
        };
        let empty = update.first_name.is_none()
            && update.last_name.is_none()
            && update.country.is_none()
            && update.investor_type.is_none()
            && update.kyc_status.is_none();
        if v.is_ok() && empty {
            v.push("body", "no updatable fields");
        }
        v.finish()?;
        Ok(update)
    }
}

/// Absent is fine; present must satisfy the length bounds.
fn present(v: &mut Validator, field: &str, value: Option<&str>, min: usize, max: usize) -> Option<String> {
    value.and_then(|s| v.required(field, Some(s), min, max))
}

fn check_amounts(v: &mut Validator, target: Option<i64>, min: Option<i64>, yield_bps: Option<i32>) {
    if let Some(t) = target {
        v.check(t > 0, "targetAmountCents", "must be positive");
    }
    if let Some(m) = min {
        v.check(m > 0, "minInvestmentCents", "must be positive");
    }
    if let (Some(t), Some(m)) = (target, min) {
        v.check(m <= t, "minInvestmentCents", "must not exceed targetAmountCents");
    }
    if let Some(y) = yield_bps {
        v.check((0..=10_000).contains(&y), "expectedYieldBps", "must be between 0 and 10000");
    }
}

impl CreateDealRequest {
    fn validate(&self) -> Result<NewDeal, ServiceError> {
        let mut v = Validator::new();
        let slug = v.required("slug", self.slug.as_deref(), 1, 96);
        if let Some(s) = &slug {
            v.check(deal::validate_slug(s).is_ok(), "slug", "lowercase letters, digits and single hyphens only");
        }
        let title = v.required("title", self.title.as_deref(), 2, 160);
        let asset_class = v.required("assetClass", self.asset_class.as_deref(), 2, 64);
        let jurisdiction = v.required("jurisdiction", self.jurisdiction.as_deref(), 2, 64);
        v.check(self.target_amount_cents.is_some(), "targetAmountCents", "is required");
        v.check(self.min_investment_cents.is_some(), "minInvestmentCents", "is required");
        check_amounts(&mut v, self.target_amount_cents, self.min_investment_cents, self.expected_yield_bps);
        let status = match self.status.as_deref() {
            Some(s) => v.one_of::<DealStatus>("status", Some(s), &names(DealStatus::ALL, DealStatus::as_str)),
            None => Some(DealStatus::Draft),
        };
        let description = v.optional("description", self.description.as_deref(), 5000);
        v.finish()?;

        match (slug, title, asset_class, jurisdiction, self.target_amount_cents, self.min_investment_cents, status) {
            (Some(slug), Some(title), Some(asset_class), Some(jurisdiction), Some(target), Some(min), Some(status)) => {
                Ok(NewDeal {
                    slug,
                    title,
                    asset_class,
                    jurisdiction,
                    target_amount_cents: target,
                    min_investment_cents: min,
                    expected_yield_bps: self.expected_yield_bps,
                    status,
                    description,
                })
            }
            _ => Err(ServiceError::invalid("body", "incomplete deal")),
        }
    }
}

impl UpdateDealRequest {
    fn validate(&self) -> Result<DealUpdate, ServiceError> {
        let mut v = Validator::new();
        let title = present(&mut v, "title", self.title.as_deref(), 2, 160);
        let asset_class = present(&mut v, "assetClass", self.asset_class.as_deref(), 2, 64);
        let jurisdiction = present(&mut v, "jurisdiction", self.jurisdiction.as_deref(), 2, 64);
        check_amounts(&mut v, self.target_amount_cents, self.min_investment_cents, self.expected_yield_bps);
        if let Some(r) = self.raised_amount_cents {
            v.check(r >= 0, "raisedAmountCents", "must not be negative");
        }
        let status = match self.status.as_deref() {
            Some(s) => v.one_of::<DealStatus>("status", Some(s), &names(DealStatus::ALL, DealStatus::as_str)),
            None => None,
        };
        let description = v.optional("description", self.description.as_deref(), 5000);
        v.finish()?;
        Ok(DealUpdate {
            title,
            asset_class,
            jurisdiction,
            target_amount_cents: self.target_amount_cents,
            raised_amount_cents: self.raised_amount_cents,
            min_investment_cents: self.min_investment_cents,
            expected_yield_bps: self.expected_yield_bps,
            status,
            description,
        })
    }
}

pub struct AdminService<R: Repository + ?Sized> {
    repo: Arc<R>,
}

impl<R: Repository + ?Sized> AdminService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn stats(&self) -> Result<AdminStats, ServiceError> {
        self.repo.stats().await
    }

    pub async fn early_access(&self, page: Pagination) -> Result<Paged<early_access_submission::Model>, ServiceError> {
        self.repo.list_submissions(page).await
    }

    pub async fn subscribers(&self, page: Pagination) -> Result<Paged<newsletter_subscriber::Model>, ServiceError> {
        self.repo.list_subscribers(page).await
    }

    pub async fn users(&self, page: Pagination) -> Result<Paged<user::Model>, ServiceError> {
        self.repo.list_users(page).await
    }

    pub async fn user_detail(&self, id: Uuid) -> Result<UserDetail, ServiceError> {
        self.repo.user_detail(id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self, req))]
    pub async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> Result<user::Model, ServiceError> {
        let update = req.validate()?;
        let user = self.repo.update_user(id, update).await?;
        info!(user = %user.id, "admin_user_updated");
        Ok(user)
    }

    #[instrument(skip_all)]
    pub async fn create_deal(&self, req: CreateDealRequest) -> Result<deal::Model, ServiceError> {
        let input = req.validate()?;
        let slug = input.slug.clone();
        // 唯一约束兜底：插入失败后按 slug 回查，已存在即视为冲突
        let created = match self.repo.create_deal(input).await {
            Ok(created) => created,
            Err(e) => match self.repo.find_deal_by_slug(&slug).await? {
                Some(_) => return Err(ServiceError::Conflict(format!("deal slug `{slug}` already exists"))),
                None => return Err(e),
            },
        };
        info!(deal = %created.id, slug = %created.slug, "admin_deal_created");
        Ok(created)
    }

    #[instrument(skip(self, req))]
    pub async fn update_deal(&self, id: Uuid, req: UpdateDealRequest) -> Result<deal::Model, ServiceError> {
        let update = req.validate()?;
        let current = self.repo.find_deal(id).await?.ok_or_else(|| ServiceError::not_found("deal"))?;
        let target = update.target_amount_cents.unwrap_or(current.target_amount_cents);
        let min = update.min_investment_cents.unwrap_or(current.min_investment_cents);
        if min > target {
            let field = if update.min_investment_cents.is_some() { "minInvestmentCents" } else { "targetAmountCents" };
            return Err(ServiceError::invalid(field, "minimum investment must not exceed the target amount"));
        }
        let updated = self.repo.update_deal(id, update).await?;
        info!(deal = %updated.id, status = %updated.status, "admin_deal_updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockStore;
    use crate::repository::{DealRepository, NewsletterRepository};

    fn deal_req(slug: &str, status: &str) -> CreateDealRequest {
        CreateDealRequest {
            slug: Some(slug.into()),
            title: Some("Lisbon Office".into()),
            asset_class: Some("real_estate".into()),
            jurisdiction: Some("PT".into()),
            target_amount_cents: Some(100_000_000),
            min_investment_cents: Some(10_000),
            expected_yield_bps: Some(650),
            status: Some(status.into()),
            description: None,
        }
    }

    #[tokio::test]
    async fn stats_reflect_store() {
        let store = Arc::new(MockStore::default());
        let svc = AdminService::new(store.clone());
        let u = store.insert_user("a@b.co", None);
        let d = svc.create_deal(deal_req("lisbon-office", "open")).await.unwrap();
        store.insert_investment(u.id, d.id, 5_000, "confirmed");
        store.insert_investment(u.id, d.id, 7_000, "pending");
        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.users, 1);
        assert_eq!(stats.open_deals, 1);
        assert_eq!(stats.confirmed_investment_cents, 5_000);
    }

    #[tokio::test]
    async fn user_detail_includes_children() {
        let store = Arc::new(MockStore::default());
        let svc = AdminService::new(store.clone());
        let u = store.insert_user("a@b.co", Some("user_a"));
        store.insert_wallet(u.id, "0xabc");
        let detail = svc.user_detail(u.id).await.unwrap();
        assert_eq!(detail.wallets.len(), 1);
        assert!(detail.transfers.is_empty());
        assert!(matches!(svc.user_detail(Uuid::new_v4()).await.unwrap_err(), ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_user_validates_and_applies() {
        let store = Arc::new(MockStore::default());
        let svc = AdminService::new(store.clone());
        let u = store.insert_user("a@b.co", None);

        let err = svc.update_user(u.id, UpdateUserRequest::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
        let err = svc
            .update_user(u.id, UpdateUserRequest { kyc_status: Some("great".into()), ..Default::default() })
            .await
            .unwrap_err();
        let ServiceError::Invalid(details) = err else { panic!("expected invalid") };
        assert_eq!(details[0].field, "kycStatus");

        let updated = svc
            .update_user(
                u.id,
                UpdateUserRequest { first_name: Some("Ada".into()), kyc_status: Some("approved".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert_eq!(updated.kyc_status, "approved");

        let missing = svc
            .update_user(Uuid::new_v4(), UpdateUserRequest { country: Some("PT".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn deal_create_rules() {
        let svc = AdminService::new(Arc::new(MockStore::default()));
        let mut bad = deal_req("Bad Slug", "open");
        bad.min_investment_cents = Some(200_000_000);
        let Err(ServiceError::Invalid(details)) = svc.create_deal(bad).await else { panic!("expected invalid") };
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["slug", "minInvestmentCents"]);

        let created = svc.create_deal(CreateDealRequest { status: None, ..deal_req("porto-loft", "open") }).await.unwrap();
        assert_eq!(created.status, "draft");
        assert!(matches!(svc.create_deal(deal_req("porto-loft", "open")).await.unwrap_err(), ServiceError::Conflict(_)));

        let updated = svc
            .update_deal(created.id, UpdateDealRequest { status: Some("open".into()), raised_amount_cents: Some(500), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.status, "open");
        assert_eq!(updated.raised_amount_cents, 500);
    }

    #[tokio::test]
    async fn slug_taken_by_concurrent_insert_is_conflict() {
        let store = Arc::new(MockStore::default());
        let svc = AdminService::new(store.clone());
        let raced = deal_req("faro-marina", "open").validate().unwrap();
        store.create_deal(raced).await.unwrap();

        let err = svc.create_deal(deal_req("faro-marina", "draft")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.deals.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deal_update_checks_stored_amounts() {
        let svc = AdminService::new(Arc::new(MockStore::default()));
        let d = svc.create_deal(deal_req("braga-lofts", "open")).await.unwrap();

        let lower_target = UpdateDealRequest { target_amount_cents: Some(5_000), ..Default::default() };
        let Err(ServiceError::Invalid(details)) = svc.update_deal(d.id, lower_target).await else {
            panic!("expected invalid")
        };
        assert_eq!(details[0].field, "targetAmountCents");

        let raise_min = UpdateDealRequest { min_investment_cents: Some(200_000_000), ..Default::default() };
        let Err(ServiceError::Invalid(details)) = svc.update_deal(d.id, raise_min).await else {
            panic!("expected invalid")
        };
        assert_eq!(details[0].field, "minInvestmentCents");

        let ok = UpdateDealRequest { target_amount_cents: Some(10_000), ..Default::default() };
        assert_eq!(svc.update_deal(d.id, ok).await.unwrap().target_amount_cents, 10_000);

        let missing = svc.update_deal(Uuid::new_v4(), UpdateDealRequest::default()).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn huge_page_number_returns_empty_page() {
        let store = Arc::new(MockStore::default());
        store.create_subscriber("a@b.co", None).await.unwrap();
        let svc = AdminService::new(store.clone());
        let page = svc.subscribers(Pagination { page: u64::MAX, per_page: 100 }).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page, Pagination::MAX_PAGE);
        assert_eq!(page.total, 1);
    }
}
