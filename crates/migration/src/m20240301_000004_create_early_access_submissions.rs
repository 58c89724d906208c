//! Create `early_access_submissions` (lead capture relayed to the CRM).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EarlyAccessSubmissions::Table)
                    .if_not_exists()
                    .col(uuid(EarlyAccessSubmissions::Id).primary_key())
                    .col(string_len(EarlyAccessSubmissions::FullName, 120).not_null())
                    .col(string_len(EarlyAccessSubmissions::Email, 254).unique_key().not_null())
                    .col(string_len_null(EarlyAccessSubmissions::Phone, 32))
                    .col(string_len(EarlyAccessSubmissions::Country, 64).not_null())
                    .col(string_len(EarlyAccessSubmissions::InvestorType, 32).not_null())
                    .col(string_len_null(EarlyAccessSubmissions::InvestmentRange, 64))
                    .col(json_binary(EarlyAccessSubmissions::Interests).not_null())
                    .col(text_null(EarlyAccessSubmissions::Message))
                    .col(boolean(EarlyAccessSubmissions::CrmSynced).not_null().default(false))
                    .col(timestamp_with_time_zone(EarlyAccessSubmissions::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EarlyAccessSubmissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EarlyAccessSubmissions {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    Country,
    InvestorType,
    InvestmentRange,
    Interests,
    Message,
    CrmSynced,
    CreatedAt,
}
