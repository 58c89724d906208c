use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use models::deal::{DealUpdate, NewDeal};
use models::early_access_submission::NewSubmission;
use models::status::{DealStatus, KycStatus, SubscriberStatus};
use models::user::ProfileUpdate;
use models::{
    deal, early_access_submission, newsletter_subscriber, payment_method, transfer, user, user_document,
    user_investment, wallet,
};

use crate::errors::ServiceError;
use crate::pagination::{Paged, Pagination};
use crate::repository::{
    AdminStats, DealRepository, EarlyAccessRepository, HealthProbe, NewsletterRepository, StatsRepository,
    UserDetail, UserRepository,
};

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct SeaOrmRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

async fn paginate<E>(
    db: &DatabaseConnection,
    select: sea_orm::Select<E>,
    page: Pagination,
) -> Result<Paged<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
{
    let (idx, per_page) = page.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Paged::new(items, page, total))
}

#[async_trait]
impl HealthProbe for SeaOrmRepository {
    async fn ping(&self) -> Result<(), ServiceError> {
        self.db.ping().await?;
        Ok(())
    }
}

#[async_trait]
impl NewsletterRepository for SeaOrmRepository {
    async fn find_subscriber(&self, email: &str) -> Result<Option<newsletter_subscriber::Model>, ServiceError> {
        Ok(newsletter_subscriber::find_by_email(&self.db, email).await?)
    }

    async fn create_subscriber(&self, email: &str, source: Option<&str>) -> Result<newsletter_subscriber::Model, ServiceError> {
        Ok(newsletter_subscriber::create(&self.db, email, source).await?)
    }

    async fn set_subscriber_status(&self, id: Uuid, status: SubscriberStatus) -> Result<newsletter_subscriber::Model, ServiceError> {
        Ok(newsletter_subscriber::set_status(&self.db, id, status).await?)
    }

    async fn list_subscribers(&self, page: Pagination) -> Result<Paged<newsletter_subscriber::Model>, ServiceError> {
        let select = newsletter_subscriber::Entity::find().order_by_desc(newsletter_subscriber::Column::SubscribedAt);
        paginate(&self.db, select, page).await
    }
}

#[async_trait]
impl EarlyAccessRepository for SeaOrmRepository {
    async fn find_submission(&self, email: &str) -> Result<Option<early_access_submission::Model>, ServiceError> {
        Ok(early_access_submission::find_by_email(&self.db, email).await?)
    }

    async fn create_submission(&self, input: NewSubmission) -> Result<early_access_submission::Model, ServiceError> {
        Ok(early_access_submission::create(&self.db, input).await?)
    }

    async fn mark_crm_synced(&self, id: Uuid) -> Result<(), ServiceError> {
        Ok(early_access_submission::mark_crm_synced(&self.db, id).await?)
    }

    async fn list_submissions(&self, page: Pagination) -> Result<Paged<early_access_submission::Model>, ServiceError> {
        let select = early_access_submission::Entity::find().order_by_desc(early_access_submission::Column::CreatedAt);
        paginate(&self.db, select, page).await
    }
}

#[async_trait]
impl UserRepository for SeaOrmRepository {
    async fn find_user(&self, key: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_external_or_id(&self.db, key).await?)
    }

    async fn set_kyc_status(&self, id: Uuid, status: KycStatus, applicant_id: Option<&str>) -> Result<user::Model, ServiceError> {
        Ok(user::set_kyc_status(&self.db, id, status, applicant_id).await?)
    }

    async fn update_user(&self, id: Uuid, update: ProfileUpdate) -> Result<user::Model, ServiceError> {
        Ok(user::update_profile(&self.db, id, update).await?)
    }

    async fn list_users(&self, page: Pagination) -> Result<Paged<user::Model>, ServiceError> {
        let select = user::Entity::find().order_by_desc(user::Column::CreatedAt);
        paginate(&self.db, select, page).await
    }

    async fn user_detail(&self, id: Uuid) -> Result<Option<UserDetail>, ServiceError> {
        let Some(user) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let (wallets, investments, transfers, documents, payment_methods) = tokio::try_join!(
            wallet::list_for_user(&self.db, id),
            user_investment::list_for_user(&self.db, id),
            transfer::list_for_user(&self.db, id),
            user_document::list_for_user(&self.db, id),
            payment_method::list_for_user(&self.db, id),
        )?;
        Ok(Some(UserDetail { user, wallets, investments, transfers, documents, payment_methods }))
    }
}

#[async_trait]
impl DealRepository for SeaOrmRepository {
    async fn list_open_deals(&self) -> Result<Vec<deal::Model>, ServiceError> {
        Ok(deal::list_by_status(&self.db, DealStatus::Open).await?)
    }

    async fn find_deal(&self, id: Uuid) -> Result<Option<deal::Model>, ServiceError> {
        Ok(deal::find_by_id(&self.db, id).await?)
    }

    async fn find_deal_by_slug(&self, slug: &str) -> Result<Option<deal::Model>, ServiceError> {
        Ok(deal::find_by_slug(&self.db, slug).await?)
    }

    async fn create_deal(&self, input: NewDeal) -> Result<deal::Model, ServiceError> {
        Ok(deal::create(&self.db, input).await?)
    }

    async fn update_deal(&self, id: Uuid, update: DealUpdate) -> Result<deal::Model, ServiceError> {
        Ok(deal::update(&self.db, id, update).await?)
    }
}

#[async_trait]
impl StatsRepository for SeaOrmRepository {
    async fn stats(&self) -> Result<AdminStats, ServiceError> {
        let db = &self.db;
        let (users, active_subscribers, early_access_submissions, open_deals) = tokio::try_join!(
            user::Entity::find().count(db),
            newsletter_subscriber::Entity::find()
                .filter(newsletter_subscriber::Column::Status.eq(SubscriberStatus::Active.as_str()))
                .count(db),
            early_access_submission::Entity::find().count(db),
            deal::Entity::find().filter(deal::Column::Status.eq(DealStatus::Open.as_str())).count(db),
        )?;
        let confirmed_investment_cents = user_investment::total_confirmed_cents(db).await?;
        Ok(AdminStats { users, active_subscribers, early_access_submissions, open_deals, confirmed_investment_cents })
    }
}
