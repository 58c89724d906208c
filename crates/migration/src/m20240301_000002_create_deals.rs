//! Create `deals`. Amounts are minor units, yield in basis points.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(uuid(Deals::Id).primary_key())
                    .col(string_len(Deals::Slug, 96).unique_key().not_null())
                    .col(string_len(Deals::Title, 160).not_null())
                    .col(string_len(Deals::AssetClass, 64).not_null())
                    .col(string_len(Deals::Jurisdiction, 64).not_null())
                    .col(big_integer(Deals::TargetAmountCents).not_null())
                    .col(big_integer(Deals::RaisedAmountCents).not_null().default(0))
                    .col(big_integer(Deals::MinInvestmentCents).not_null())
                    .col(integer_null(Deals::ExpectedYieldBps))
                    .col(string_len(Deals::Status, 16).not_null())
                    .col(text_null(Deals::Description))
                    .col(timestamp_with_time_zone(Deals::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Deals::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Deals::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Deals {
    Table,
    Id,
    Slug,
    Title,
    AssetClass,
    Jurisdiction,
    TargetAmountCents,
    RaisedAmountCents,
    MinInvestmentCents,
    ExpectedYieldBps,
    Status,
    Description,
    CreatedAt,
    UpdatedAt,
}
