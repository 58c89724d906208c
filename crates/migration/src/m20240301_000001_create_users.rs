//! Create `users`.
//!
//! `external_id` holds the auth-provider user id; KYC status is mirrored here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len_null(Users::ExternalId, 128).unique_key())
                    .col(string_len(Users::Email, 254).unique_key().not_null())
                    .col(string_len_null(Users::FirstName, 80))
                    .col(string_len_null(Users::LastName, 80))
                    .col(string_len_null(Users::Country, 64))
                    .col(string_len_null(Users::InvestorType, 32))
                    .col(string_len(Users::KycStatus, 32).not_null().default("not_started"))
                    .col(string_len_null(Users::KycApplicantId, 64))
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Users::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    ExternalId,
    Email,
    FirstName,
    LastName,
    Country,
    InvestorType,
    KycStatus,
    KycApplicantId,
    CreatedAt,
    UpdatedAt,
}
