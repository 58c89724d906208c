use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscribers::Table)
                    .if_not_exists()
                    .col(uuid(NewsletterSubscribers::Id).primary_key())
                    // one row per address; re-subscribing flips status instead of inserting
                    .col(string_len(NewsletterSubscribers::Email, 254).unique_key().not_null())
                    .col(string_len(NewsletterSubscribers::Status, 16).not_null())
                    .col(string_len_null(NewsletterSubscribers::Source, 64))
                    .col(timestamp_with_time_zone(NewsletterSubscribers::SubscribedAt).not_null())
                    .col(timestamp_with_time_zone_null(NewsletterSubscribers::UnsubscribedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsletterSubscribers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NewsletterSubscribers { Table, Id, Email, Status, Source, SubscribedAt, UnsubscribedAt }
