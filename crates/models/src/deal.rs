use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::status::DealStatus;
use crate::user_investment;
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deals")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub asset_class: String,
    pub jurisdiction: String,
    pub target_amount_cents: i64,
    pub raised_amount_cents: i64,
    pub min_investment_cents: i64,
    pub expected_yield_bps: Option<i32>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserInvestment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserInvestment => Entity::has_many(user_investment::Entity).into(),
        }
    }
}

impl Related<user_investment::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserInvestment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeal {
    pub slug: String,
    pub title: String,
    pub asset_class: String,
    pub jurisdiction: String,
    pub target_amount_cents: i64,
    pub min_investment_cents: i64,
    pub expected_yield_bps: Option<i32>,
    pub status: DealStatus,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealUpdate {
    pub title: Option<String>,
    pub asset_class: Option<String>,
    pub jurisdiction: Option<String>,
    pub target_amount_cents: Option<i64>,
    pub raised_amount_cents: Option<i64>,
    pub min_investment_cents: Option<i64>,
    pub expected_yield_bps: Option<i32>,
    pub status: Option<DealStatus>,
    pub description: Option<String>,
}

/// Slugs appear in public URLs: lowercase ascii, digits and single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), ModelError> {
    let ok = !slug.is_empty()
        && slug.len() <= 96
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("invalid slug `{slug}`")))
    }
}

pub async fn create(db: &DatabaseConnection, input: NewDeal) -> Result<Model, ModelError> {
    validate_slug(&input.slug)?;
    validation::validate_required("title", &input.title, 160)?;
    if input.target_amount_cents <= 0 || input.min_investment_cents <= 0 {
        return Err(ModelError::Validation("amounts must be positive".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        slug: Set(input.slug),
        title: Set(input.title),
        asset_class: Set(input.asset_class),
        jurisdiction: Set(input.jurisdiction),
        target_amount_cents: Set(input.target_amount_cents),
        raised_amount_cents: Set(0),
        min_investment_cents: Set(input.min_investment_cents),
        expected_yield_bps: Set(input.expected_yield_bps),
        status: Set(input.status.as_str().to_string()),
        description: Set(input.description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, update: DealUpdate) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id).one(db).await?.ok_or(ModelError::NotFound("deal"))?.into();
    if let Some(v) = update.title { am.title = Set(v); }
    if let Some(v) = update.asset_class { am.asset_class = Set(v); }
    if let Some(v) = update.jurisdiction { am.jurisdiction = Set(v); }
    if let Some(v) = update.target_amount_cents { am.target_amount_cents = Set(v); }
    if let Some(v) = update.raised_amount_cents { am.raised_amount_cents = Set(v); }
    if let Some(v) = update.min_investment_cents { am.min_investment_cents = Set(v); }
    if let Some(v) = update.expected_yield_bps { am.expected_yield_bps = Set(Some(v)); }
    if let Some(v) = update.status { am.status = Set(v.as_str().to_string()); }
    if let Some(v) = update.description { am.description = Set(Some(v)); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Slug.eq(slug)).one(db).await?)
}

pub async fn list_by_status(db: &DatabaseConnection, status: DealStatus) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Status.eq(status.as_str()))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::validate_slug;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("lisbon-office-2024").is_ok());
        for bad in ["", "-lead", "trail-", "double--dash", "Upper", "sp ace", "ünï"] {
            assert!(validate_slug(bad).is_err(), "{bad}");
        }
    }
}
