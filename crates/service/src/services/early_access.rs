//! Early-access (investor waitlist) submissions.

use std::sync::Arc;

use common::metrics;
use models::early_access_submission::{self, NewSubmission};
use models::status::InvestorType;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::background::spawn_side_effect;
use crate::errors::ServiceError;
use crate::integrations::{templates, CrmRelay, EmailSender};
use crate::repository::EarlyAccessRepository;
use crate::validation::Validator;

pub const MAX_INTERESTS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyAccessRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub investor_type: Option<String>,
    pub investment_range: Option<String>,
    pub interests: Option<Vec<String>>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyAccessOutcome {
    Created(Uuid),
    AlreadySubmitted(Uuid),
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '+' | '(' | ')' | '-')
}

impl EarlyAccessRequest {
    pub fn validate(&self) -> Result<NewSubmission, ServiceError> {
        let mut v = Validator::new();
        let full_name = v.required("fullName", self.full_name.as_deref(), 2, 120);
        let email = v.email("email", self.email.as_deref());
        let phone = v.optional("phone", self.phone.as_deref(), 32);
        if let Some(p) = &phone {
            v.check(p.chars().all(is_phone_char), "phone", "may only contain digits, spaces and + ( ) -");
        }
        let country = v.required("country", self.country.as_deref(), 2, 64);
        let allowed: Vec<&str> = InvestorType::ALL.iter().map(|t| t.as_str()).collect();
        let investor_type = v.one_of::<InvestorType>("investorType", self.investor_type.as_deref(), &allowed);
        let investment_range = v.optional("investmentRange", self.investment_range.as_deref(), 64);
        let message = v.optional("message", self.message.as_deref(), 2000);

        let mut interests = Vec::new();
        let raw = self.interests.as_deref().unwrap_or_default();
        if raw.len() > MAX_INTERESTS {
            v.push("interests", format!("at most {MAX_INTERESTS} entries"));
        } else {
            for item in raw {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                if item.chars().count() > 64 {
                    v.push("interests", "each entry must be at most 64 characters");
                    break;
                }
                interests.push(item.to_string());
            }
        }
        v.finish()?;

        match (full_name, email, country, investor_type) {
            (Some(full_name), Some(email), Some(country), Some(investor_type)) => Ok(NewSubmission {
                full_name,
                email,
                phone,
                country,
                investor_type: investor_type.as_str().to_string(),
                investment_range,
                interests,
                message,
            }),
            _ => Err(ServiceError::invalid("body", "incomplete submission")),
        }
    }
}

/// Payload posted to the CRM webhook.
pub fn crm_event(row: &early_access_submission::Model) -> serde_json::Value {
    json!({
        "event": "early_access_submitted",
        "id": row.id,
        "fullName": row.full_name,
        "email": row.email,
        "phone": row.phone,
        "country": row.country,
        "investorType": row.investor_type,
        "investmentRange": row.investment_range,
        "interests": row.interests,
        "message": row.message,
        "submittedAt": row.created_at,
    })
}

pub struct EarlyAccessService<R: EarlyAccessRepository + ?Sized> {
    repo: Arc<R>,
    email: Option<Arc<dyn EmailSender>>,
    crm: Option<Arc<dyn CrmRelay>>,
}

impl<R: EarlyAccessRepository + ?Sized + 'static> EarlyAccessService<R> {
    pub fn new(repo: Arc<R>, email: Option<Arc<dyn EmailSender>>, crm: Option<Arc<dyn CrmRelay>>) -> Self {
        Self { repo, email, crm }
    }

    #[instrument(skip_all)]
    pub async fn submit(&self, req: EarlyAccessRequest) -> Result<EarlyAccessOutcome, ServiceError> {
        let input = req.validate()?;
        if let Some(existing) = self.repo.find_submission(&input.email).await? {
            info!(id = %existing.id, "early_access_duplicate");
            return Ok(EarlyAccessOutcome::AlreadySubmitted(existing.id));
        }
        let row = match self.repo.create_submission(input.clone()).await {
            Ok(row) => row,
            Err(e) => match self.repo.find_submission(&input.email).await? {
                Some(existing) => return Ok(EarlyAccessOutcome::AlreadySubmitted(existing.id)),
                None => return Err(e),
            },
        };
        metrics::EARLY_ACCESS_SUBMISSIONS_TOTAL.inc();
        info!(id = %row.id, investor_type = %row.investor_type, "early_access_submitted");

        self.relay_to_crm(&row);
        self.send_confirmation(&row);
        Ok(EarlyAccessOutcome::Created(row.id))
    }

    fn relay_to_crm(&self, row: &early_access_submission::Model) {
        let Some(crm) = self.crm.clone() else {
            warn!("crm webhook not configured; submission stays unsynced");
            return;
        };
        let repo = self.repo.clone();
        let id = row.id;
        let event = crm_event(row);
        spawn_side_effect("crm_relay", async move {
            crm.relay(&event).await?;
            repo.mark_crm_synced(id).await?;
            Ok::<(), ServiceError>(())
        });
    }

    fn send_confirmation(&self, row: &early_access_submission::Model) {
        let Some(sender) = self.email.clone() else { return };
        let message = templates::early_access_confirmation(&row.email, &row.full_name);
        spawn_side_effect("confirmation_email", async move { sender.send(message).await.map(|_| ()) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::mock::{MockCrmRelay, MockEmailSender};
    use crate::repository::mock::MockStore;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn valid() -> EarlyAccessRequest {
        EarlyAccessRequest {
            full_name: Some("Ada Lovelace".into()),
            email: Some("Ada@Example.com".into()),
            phone: Some("+44 (20) 7946-0000".into()),
            country: Some("United Kingdom".into()),
            investor_type: Some("accredited".into()),
            investment_range: Some("50k-250k".into()),
            interests: Some(vec!["real-estate".into(), " ".into(), "art".into()]),
            message: None,
        }
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

    #[test]
    fn validation_reports_each_field() {
        let req = EarlyAccessRequest {
            full_name: Some("A".into()),
            email: Some("bad".into()),
            phone: Some("call me".into()),
            country: None,
            investor_type: Some("whale".into()),
            interests: Some(vec!["x".into(); 11]),
            ..Default::default()
        };
        let Err(ServiceError::Invalid(details)) = req.validate() else { panic!("expected invalid") };
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["fullName", "email", "phone", "country", "investorType", "interests"]);
    }

    #[test]
    fn validation_normalizes() {
        let input = valid().validate().unwrap();
        assert_eq!(input.email, "ada@example.com");
        assert_eq!(input.interests, ["real-estate", "art"]);
        assert_eq!(input.investor_type, "accredited");
    }

    #[tokio::test]
    async fn submit_relays_and_marks_synced() {
        let store = Arc::new(MockStore::default());
        let crm = Arc::new(MockCrmRelay::default());
        let mail = Arc::new(MockEmailSender::default());
        let svc = EarlyAccessService::new(
            store.clone(),
            Some(mail.clone() as Arc<dyn EmailSender>),
            Some(crm.clone() as Arc<dyn CrmRelay>),
        );
        let EarlyAccessOutcome::Created(id) = svc.submit(valid()).await.unwrap() else { panic!("expected created") };

        wait_for(|| store.submission("ada@example.com").map(|s| s.crm_synced).unwrap_or(false)).await;
        let events = crm.events();
        assert_eq!(events[0]["event"], "early_access_submitted");
        assert_eq!(events[0]["id"], id.to_string());
        wait_for(|| mail.sent().len() == 1).await;
        assert!(mail.sent()[0].html.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn duplicate_email_returns_existing_id() {
        let store = Arc::new(MockStore::default());
        let svc = EarlyAccessService::new(store.clone(), None, None);
        let EarlyAccessOutcome::Created(id) = svc.submit(valid()).await.unwrap() else { panic!("expected created") };
        assert_eq!(svc.submit(valid()).await.unwrap(), EarlyAccessOutcome::AlreadySubmitted(id));
        assert_eq!(store.submissions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn crm_failure_leaves_row_unsynced() {
        let store = Arc::new(MockStore::default());
        let crm = Arc::new(MockCrmRelay::default());
        crm.fail.store(true, Ordering::SeqCst);
        let svc = EarlyAccessService::new(store.clone(), None, Some(crm.clone() as Arc<dyn CrmRelay>));
        assert!(matches!(svc.submit(valid()).await.unwrap(), EarlyAccessOutcome::Created(_)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!store.submission("ada@example.com").unwrap().crm_synced);
    }
}
