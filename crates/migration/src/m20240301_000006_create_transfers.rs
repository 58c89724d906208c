use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(uuid(Transfers::Id).primary_key())
                    .col(uuid(Transfers::UserId).not_null())
                    .col(uuid_null(Transfers::WalletId))
                    .col(string_len(Transfers::Direction, 16).not_null())
                    .col(big_integer(Transfers::AmountCents).not_null())
                    .col(string_len(Transfers::Currency, 8).not_null())
                    .col(string_len(Transfers::Status, 16).not_null())
                    .col(string_len_null(Transfers::Reference, 128))
                    .col(timestamp_with_time_zone(Transfers::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_user")
                            .from(Transfers::Table, Transfers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // wallet removal keeps the transfer history
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_wallet")
                            .from(Transfers::Table, Transfers::WalletId)
                            .to(Wallets::Table, Wallets::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Transfers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Transfers { Table, Id, UserId, WalletId, Direction, AmountCents, Currency, Status, Reference, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Wallets { Table, Id }
