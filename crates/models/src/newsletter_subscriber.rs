use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::status::SubscriberStatus;
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "newsletter_subscribers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub status: String,
    pub source: Option<String>,
    pub subscribed_at: DateTimeWithTimeZone,
    pub unsubscribed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == SubscriberStatus::Active.as_str()
    }
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// Insert an active subscriber. `email` must already be normalized.
pub async fn create(db: &DatabaseConnection, email: &str, source: Option<&str>) -> Result<Model, ModelError> {
    validation::validate_email(email)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        status: Set(SubscriberStatus::Active.as_str().to_string()),
        source: Set(source.map(str::to_string)),
        subscribed_at: Set(Utc::now().into()),
        unsubscribed_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

pub async fn set_status(db: &DatabaseConnection, id: Uuid, status: SubscriberStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ModelError::NotFound("subscriber"))?
        .into();
    let now = Utc::now();
    am.status = Set(status.as_str().to_string());
    match status {
        SubscriberStatus::Active => {
            am.subscribed_at = Set(now.into());
            am.unsubscribed_at = Set(None);
        }
        SubscriberStatus::Unsubscribed => am.unsubscribed_at = Set(Some(now.into())),
    }
    Ok(am.update(db).await?)
}
