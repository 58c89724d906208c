use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table) pairs indexed on `user_id`
const USER_FK_INDEXES: [(&str, &str); 5] = [
    ("idx_wallets_user", "wallets"),
    ("idx_transfers_user", "transfers"),
    ("idx_payment_methods_user", "payment_methods"),
    ("idx_user_documents_user", "user_documents"),
    ("idx_user_investments_user", "user_investments"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Child tables: lookups by owning user
        for (name, table) in USER_FK_INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Alias::new(table))
                        .col(Alias::new("user_id"))
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_user_investments_deal")
                    .table(UserInvestments::Table)
                    .col(UserInvestments::DealId)
                    .to_owned(),
            )
            .await?;

        // Deals: public listing filters by status, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_deals_status_created")
                    .table(Deals::Table)
                    .col(Deals::Status)
                    .col(Deals::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Admin lists order by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_early_access_created")
                    .table(EarlyAccessSubmissions::Table)
                    .col(EarlyAccessSubmissions::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_newsletter_status")
                    .table(NewsletterSubscribers::Table)
                    .col(NewsletterSubscribers::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in USER_FK_INDEXES {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        manager
            .drop_index(Index::drop().name("idx_user_investments_deal").table(UserInvestments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_deals_status_created").table(Deals::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_early_access_created").table(EarlyAccessSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_newsletter_status").table(NewsletterSubscribers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserInvestments { Table, DealId }

#[derive(DeriveIden)]
enum Deals { Table, Status, CreatedAt }

#[derive(DeriveIden)]
enum EarlyAccessSubmissions { Table, CreatedAt }

#[derive(DeriveIden)]
enum NewsletterSubscribers { Table, Status }
