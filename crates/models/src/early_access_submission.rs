use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "early_access_submissions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    pub investor_type: String,
    pub investment_range: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub interests: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub crm_synced: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Already-validated submission fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    pub investor_type: String,
    pub investment_range: Option<String>,
    pub interests: Vec<String>,
    pub message: Option<String>,
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

pub async fn create(db: &DatabaseConnection, input: NewSubmission) -> Result<Model, ModelError> {
    validation::validate_email(&input.email)?;
    validation::validate_required("full_name", &input.full_name, 120)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(input.full_name),
        email: Set(input.email),
        phone: Set(input.phone),
        country: Set(input.country),
        investor_type: Set(input.investor_type),
        investment_range: Set(input.investment_range),
        interests: Set(serde_json::json!(input.interests)),
        message: Set(input.message),
        crm_synced: Set(false),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn mark_crm_synced(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ModelError::NotFound("early access submission"))?
        .into();
    am.crm_synced = Set(true);
    am.update(db).await?;
    Ok(())
}
