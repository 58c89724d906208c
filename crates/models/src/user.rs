use chrono::Utc;
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::status::KycStatus;
use crate::validation;
use crate::{payment_method, transfer, user_document, user_investment, wallet};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_id: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub investor_type: Option<String>,
    pub kyc_status: String,
    pub kyc_applicant_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Wallet,
    Transfer,
    PaymentMethod,
    UserDocument,
    UserInvestment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Wallet => Entity::has_many(wallet::Entity).into(),
            Relation::Transfer => Entity::has_many(transfer::Entity).into(),
            Relation::PaymentMethod => Entity::has_many(payment_method::Entity).into(),
            Relation::UserDocument => Entity::has_many(user_document::Entity).into(),
            Relation::UserInvestment => Entity::has_many(user_investment::Entity).into(),
        }
    }
}

impl Related<wallet::Entity> for Entity {
    fn to() -> RelationDef { Relation::Wallet.def() }
}

impl Related<transfer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Transfer.def() }
}

impl Related<payment_method::Entity> for Entity {
    fn to() -> RelationDef { Relation::PaymentMethod.def() }
}

impl Related<user_document::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserDocument.def() }
}

impl Related<user_investment::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserInvestment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Profile fields an admin may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub investor_type: Option<String>,
    pub kyc_status: Option<KycStatus>,
}

pub async fn create(db: &DatabaseConnection, email: &str, external_id: Option<&str>) -> Result<Model, ModelError> {
    let email = validation::normalize_email(email);
    validation::validate_email(&email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        external_id: Set(external_id.map(str::to_string)),
        email: Set(email),
        first_name: Set(None),
        last_name: Set(None),
        country: Set(None),
        investor_type: Set(None),
        kyc_status: Set(KycStatus::NotStarted.as_str().to_string()),
        kyc_applicant_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Resolve a user from the identifier the frontend knows: the auth-provider
/// id, or our own UUID.
pub async fn find_by_external_or_id(db: &DatabaseConnection, key: &str) -> Result<Option<Model>, ModelError> {
    let mut cond = Condition::any().add(Column::ExternalId.eq(key));
    if let Ok(id) = Uuid::parse_str(key) {
        cond = cond.add(Column::Id.eq(id));
    }
    Ok(Entity::find().filter(cond).one(db).await?)
}

pub async fn set_kyc_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: KycStatus,
    applicant_id: Option<&str>,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id).one(db).await?.ok_or(ModelError::NotFound("user"))?.into();
    am.kyc_status = Set(status.as_str().to_string());
    if let Some(applicant) = applicant_id {
        am.kyc_applicant_id = Set(Some(applicant.to_string()));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn update_profile(db: &DatabaseConnection, id: Uuid, update: ProfileUpdate) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id).one(db).await?.ok_or(ModelError::NotFound("user"))?.into();
    if let Some(v) = update.first_name { am.first_name = Set(Some(v)); }
    if let Some(v) = update.last_name { am.last_name = Set(Some(v)); }
    if let Some(v) = update.country { am.country = Set(Some(v)); }
    if let Some(v) = update.investor_type { am.investor_type = Set(Some(v)); }
    if let Some(v) = update.kyc_status { am.kyc_status = Set(v.as_str().to_string()); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
