use std::sync::Arc;

use models::deal;
use models::status::DealStatus;

use crate::errors::ServiceError;
use crate::repository::DealRepository;

/// Public, read-only view of the deal catalogue.
pub struct DealService<R: DealRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: DealRepository + ?Sized> DealService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn open_deals(&self) -> Result<Vec<deal::Model>, ServiceError> {
        self.repo.list_open_deals().await
    }

    /// Drafts are invisible to the public.
    pub async fn by_slug(&self, slug: &str) -> Result<deal::Model, ServiceError> {
        match self.repo.find_deal_by_slug(slug).await? {
            Some(d) if d.status != DealStatus::Draft.as_str() => Ok(d),
            _ => Err(ServiceError::not_found("deal")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockStore;
    use models::deal::{DealUpdate, NewDeal};

    fn new_deal(slug: &str, status: DealStatus) -> NewDeal {
        NewDeal {
            slug: slug.into(),
            title: "Vineyard".into(),
            asset_class: "agriculture".into(),
            jurisdiction: "FR".into(),
            target_amount_cents: 1_000_000,
            min_investment_cents: 5_000,
            expected_yield_bps: None,
            status,
            description: None,
        }
    }

    #[tokio::test]
    async fn drafts_hidden_and_only_open_listed() {
        let store = Arc::new(MockStore::default());
        store.create_deal(new_deal("draft-one", DealStatus::Draft)).await.unwrap();
        store.create_deal(new_deal("open-one", DealStatus::Open)).await.unwrap();
        let closed = store.create_deal(new_deal("closed-one", DealStatus::Open)).await.unwrap();
        store
            .update_deal(closed.id, DealUpdate { status: Some(DealStatus::Closed), ..Default::default() })
            .await
            .unwrap();

        let svc = DealService::new(store);
        let open: Vec<_> = svc.open_deals().await.unwrap().into_iter().map(|d| d.slug).collect();
        assert_eq!(open, ["open-one"]);
        assert!(matches!(svc.by_slug("draft-one").await.unwrap_err(), ServiceError::NotFound(_)));
        assert_eq!(svc.by_slug("closed-one").await.unwrap().status, "closed");
        assert!(svc.by_slug("missing").await.is_err());
    }
}
