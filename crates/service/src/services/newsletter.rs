//! Newsletter subscribe / unsubscribe.

use std::sync::Arc;

use common::metrics;
use models::status::SubscriberStatus;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::background::spawn_side_effect;
use crate::errors::ServiceError;
use crate::integrations::{templates, EmailSender};
use crate::repository::NewsletterRepository;
use crate::validation::Validator;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub email: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    AlreadySubscribed,
    Resubscribed,
}

pub struct NewsletterService<R: NewsletterRepository + ?Sized> {
    repo: Arc<R>,
    email: Option<Arc<dyn EmailSender>>,
}

impl<R: NewsletterRepository + ?Sized> NewsletterService<R> {
    pub fn new(repo: Arc<R>, email: Option<Arc<dyn EmailSender>>) -> Self { Self { repo, email } }

    /// Subscribe an address. Only a brand-new row triggers the welcome email.
    ///
    /// # Examples
    /// ```
    /// use service::repository::mock::MockStore;
    /// use service::services::newsletter::{NewsletterService, SubscribeOutcome, SubscribeRequest};
    /// use std::sync::Arc;
    /// let svc = NewsletterService::new(Arc::new(MockStore::default()), None);
    /// let req = SubscribeRequest { email: Some(" Ada@Example.com ".into()), source: None };
    /// assert_eq!(tokio_test::block_on(svc.subscribe(req.clone())).unwrap(), SubscribeOutcome::Created);
    /// assert_eq!(tokio_test::block_on(svc.subscribe(req)).unwrap(), SubscribeOutcome::AlreadySubscribed);
    /// ```
    #[instrument(skip_all)]
    pub async fn subscribe(&self, req: SubscribeRequest) -> Result<SubscribeOutcome, ServiceError> {
        let mut v = Validator::new();
        let email = v.email("email", req.email.as_deref());
        let source = v.optional("source", req.source.as_deref(), 64);
        v.finish()?;
        let email = email.ok_or_else(|| ServiceError::invalid("email", "is required"))?;

        let outcome = match self.repo.find_subscriber(&email).await? {
            Some(existing) if existing.is_active() => SubscribeOutcome::AlreadySubscribed,
            Some(existing) => {
                self.repo.set_subscriber_status(existing.id, SubscriberStatus::Active).await?;
                SubscribeOutcome::Resubscribed
            }
            None => match self.repo.create_subscriber(&email, source.as_deref()).await {
                Ok(_) => {
                    self.send_welcome(&email);
                    SubscribeOutcome::Created
                }
                // lost a race with a concurrent insert of the same address
                Err(e) => match self.repo.find_subscriber(&email).await? {
                    Some(_) => SubscribeOutcome::AlreadySubscribed,
                    None => return Err(e),
                },
            },
        };

        let label = match outcome {
            SubscribeOutcome::Created => "created",
            SubscribeOutcome::AlreadySubscribed => "duplicate",
            SubscribeOutcome::Resubscribed => "reactivated",
        };
        metrics::newsletter_event(label);
        info!(outcome = label, "newsletter_subscribe");
        Ok(outcome)
    }

    /// Idempotent for an already unsubscribed address; unknown addresses are `NotFound`.
    #[instrument(skip_all)]
    pub async fn unsubscribe(&self, req: UnsubscribeRequest) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        let email = v.email("email", req.email.as_deref());
        v.finish()?;
        let email = email.ok_or_else(|| ServiceError::invalid("email", "is required"))?;

        let existing = self.repo.find_subscriber(&email).await?.ok_or_else(|| ServiceError::not_found("subscriber"))?;
        if existing.is_active() {
            self.repo.set_subscriber_status(existing.id, SubscriberStatus::Unsubscribed).await?;
            metrics::newsletter_event("unsubscribed");
            info!("newsletter_unsubscribe");
        }
        Ok(())
    }

    fn send_welcome(&self, to: &str) {
        let Some(sender) = self.email.clone() else {
            warn!("email not configured; skipping welcome email");
            return;
        };
        let message = templates::newsletter_welcome(to);
        spawn_side_effect("welcome_email", async move { sender.send(message).await.map(|_| ()) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::mock::MockEmailSender;
    use crate::repository::mock::MockStore;
    use std::time::Duration;

    fn req(email: &str) -> SubscribeRequest {
        SubscribeRequest { email: Some(email.into()), source: Some("footer".into()) }
    }

    async fn wait_for(mut cond: impl FnMut() -> bool) {
        for _ in 0..100 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn duplicate_subscribe_keeps_one_row_and_one_email() {
        let store = Arc::new(MockStore::default());
        let mail = Arc::new(MockEmailSender::default());
        let svc = NewsletterService::new(store.clone(), Some(mail.clone() as Arc<dyn EmailSender>));

        assert_eq!(svc.subscribe(req("Ada@Example.com")).await.unwrap(), SubscribeOutcome::Created);
        assert_eq!(svc.subscribe(req("ada@example.com ")).await.unwrap(), SubscribeOutcome::AlreadySubscribed);
        assert_eq!(store.subscribers.lock().unwrap().len(), 1);

        wait_for(|| mail.sent().len() == 1).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(mail.sent().len(), 1);
        assert_eq!(mail.sent()[0].to, "ada@example.com");
    }

    #[tokio::test]
    async fn unsubscribed_address_is_reactivated_without_email() {
        let store = Arc::new(MockStore::default());
        let mail = Arc::new(MockEmailSender::default());
        let svc = NewsletterService::new(store.clone(), Some(mail.clone() as Arc<dyn EmailSender>));
        svc.subscribe(req("bob@example.com")).await.unwrap();
        wait_for(|| mail.sent().len() == 1).await;

        svc.unsubscribe(UnsubscribeRequest { email: Some("bob@example.com".into()) }).await.unwrap();
        let row = store.subscriber("bob@example.com").unwrap();
        assert_eq!(row.status, "unsubscribed");
        assert!(row.unsubscribed_at.is_some());

        assert_eq!(svc.subscribe(req("bob@example.com")).await.unwrap(), SubscribeOutcome::Resubscribed);
        let row = store.subscriber("bob@example.com").unwrap();
        assert!(row.is_active());
        assert!(row.unsubscribed_at.is_none());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(mail.sent().len(), 1);
    }

    #[tokio::test]
    async fn unsubscribe_unknown_is_not_found_and_repeat_is_ok() {
        let store = Arc::new(MockStore::default());
        let svc = NewsletterService::new(store.clone(), None);
        let err = svc.unsubscribe(UnsubscribeRequest { email: Some("ghost@example.com".into()) }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        svc.subscribe(req("carol@example.com")).await.unwrap();
        let un = || UnsubscribeRequest { email: Some("carol@example.com".into()) };
        svc.unsubscribe(un()).await.unwrap();
        svc.unsubscribe(un()).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_email_rejected_before_storage() {
        let store = Arc::new(MockStore::default());
        let svc = NewsletterService::new(store.clone(), None);
        let err = svc.subscribe(req("not-an-email")).await.unwrap_err();
        let ServiceError::Invalid(details) = err else { panic!("expected invalid") };
        assert_eq!(details[0].field, "email");
        assert!(store.subscribers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_email_does_not_fail_subscribe() {
        let store = Arc::new(MockStore::default());
        let mail = Arc::new(MockEmailSender::default());
        mail.fail.store(true, std::sync::atomic::Ordering::SeqCst);
        let svc = NewsletterService::new(store.clone(), Some(mail as Arc<dyn EmailSender>));
        assert_eq!(svc.subscribe(req("dan@example.com")).await.unwrap(), SubscribeOutcome::Created);
    }
}
