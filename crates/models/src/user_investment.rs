use sea_orm::{entity::prelude::*, sea_query::Alias, DatabaseConnection, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::status::InvestmentStatus;
use crate::{deal, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_investments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub deal_id: Uuid,
    pub amount_cents: i64,
    pub token_amount: i64,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Deal,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Deal => Entity::belongs_to(deal::Entity).from(Column::DealId).to(deal::Column::Id).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<deal::Entity> for Entity {
    fn to() -> RelationDef { Relation::Deal.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Sum of confirmed investments across all users, in minor units.
pub async fn total_confirmed_cents(db: &DatabaseConnection) -> Result<i64, ModelError> {
    let total: Option<Option<i64>> = Entity::find()
        .select_only()
        // SUM(bigint) is NUMERIC in Postgres
        .column_as(Column::AmountCents.sum().cast_as(Alias::new("bigint")), "total")
        .filter(Column::Status.eq(InvestmentStatus::Confirmed.as_str()))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}
