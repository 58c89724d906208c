use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use super::setup_test_db;
use crate::status::{DealStatus, InvestmentStatus, KycStatus, SubscriberStatus};
use crate::{deal, early_access_submission, newsletter_subscriber, user, user_investment, wallet};

fn unique_email(prefix: &str) -> String {
    format!("{prefix}_{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
async fn newsletter_subscriber_lifecycle() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email("news");
    let created = newsletter_subscriber::create(&db, &email, Some("footer")).await?;
    assert!(created.is_active());

    let found = newsletter_subscriber::find_by_email(&db, &email).await?.expect("row");
    assert_eq!(found.id, created.id);

    // the unique index rejects a second row for the same address
    assert!(newsletter_subscriber::create(&db, &email, None).await.is_err());

    let off = newsletter_subscriber::set_status(&db, created.id, SubscriberStatus::Unsubscribed).await?;
    assert!(!off.is_active());
    assert!(off.unsubscribed_at.is_some());

    let on = newsletter_subscriber::set_status(&db, created.id, SubscriberStatus::Active).await?;
    assert!(on.is_active());
    assert!(on.unsubscribed_at.is_none());

    newsletter_subscriber::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn early_access_crm_flag() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let sub = early_access_submission::create(
        &db,
        early_access_submission::NewSubmission {
            full_name: "Ada Lovelace".into(),
            email: unique_email("lead"),
            country: "PT".into(),
            investor_type: "individual".into(),
            interests: vec!["real_estate".into()],
            ..Default::default()
        },
    )
    .await?;
    assert!(!sub.crm_synced);
    assert_eq!(sub.interests, serde_json::json!(["real_estate"]));

    early_access_submission::mark_crm_synced(&db, sub.id).await?;
    let reloaded = early_access_submission::Entity::find_by_id(sub.id).one(&db).await?.expect("row");
    assert!(reloaded.crm_synced);

    early_access_submission::Entity::delete_by_id(sub.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn user_kyc_and_children_cascade() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let external = format!("user_{}", Uuid::new_v4().simple());
    let u = user::create(&db, &unique_email("investor"), Some(&external)).await?;
    assert_eq!(u.kyc_status, KycStatus::NotStarted.as_str());

    let by_external = user::find_by_external_or_id(&db, &external).await?.expect("by external id");
    assert_eq!(by_external.id, u.id);
    let by_id = user::find_by_external_or_id(&db, &u.id.to_string()).await?.expect("by id");
    assert_eq!(by_id.id, u.id);

    let updated = user::set_kyc_status(&db, u.id, KycStatus::Approved, Some("applicant-1")).await?;
    assert_eq!(updated.kyc_status, "approved");
    assert_eq!(updated.kyc_applicant_id.as_deref(), Some("applicant-1"));

    let d = deal::create(
        &db,
        deal::NewDeal {
            slug: format!("deal-{}", Uuid::new_v4().simple()),
            title: "Porto Logistics Hub".into(),
            asset_class: "real_estate".into(),
            jurisdiction: "PT".into(),
            target_amount_cents: 50_000_000,
            min_investment_cents: 100_000,
            expected_yield_bps: Some(750),
            status: DealStatus::Open,
            description: None,
        },
    )
    .await?;

    let now = chrono::Utc::now();
    wallet::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(u.id),
        address: Set("0xabc".into()),
        network: Set("polygon".into()),
        label: Set(None),
        is_primary: Set(true),
        created_at: Set(now.into()),
    }
    .insert(&db)
    .await?;
    user_investment::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(u.id),
        deal_id: Set(d.id),
        amount_cents: Set(250_000),
        token_amount: Set(250),
        status: Set(InvestmentStatus::Confirmed.as_str().into()),
        created_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    assert_eq!(wallet::list_for_user(&db, u.id).await?.len(), 1);
    assert_eq!(user_investment::list_for_user(&db, u.id).await?.len(), 1);
    assert!(user_investment::total_confirmed_cents(&db).await? >= 250_000);

    user::hard_delete(&db, u.id).await?;
    assert!(wallet::list_for_user(&db, u.id).await?.is_empty());
    deal::Entity::delete_by_id(d.id).exec(&db).await?;
    Ok(())
}
