//! Create `wallets` with FK to `users`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(uuid(Wallets::Id).primary_key())
                    .col(uuid(Wallets::UserId).not_null())
                    .col(string_len(Wallets::Address, 128).not_null())
                    .col(string_len(Wallets::Network, 32).not_null())
                    .col(string_len_null(Wallets::Label, 64))
                    .col(boolean(Wallets::IsPrimary).not_null().default(false))
                    .col(timestamp_with_time_zone(Wallets::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallets_user")
                            .from(Wallets::Table, Wallets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Wallets::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Wallets { Table, Id, UserId, Address, Network, Label, IsPrimary, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
