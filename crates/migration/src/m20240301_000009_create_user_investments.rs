//! Create `user_investments` linking users to deals.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserInvestments::Table)
                    .if_not_exists()
                    .col(uuid(UserInvestments::Id).primary_key())
                    .col(uuid(UserInvestments::UserId).not_null())
                    .col(uuid(UserInvestments::DealId).not_null())
                    .col(big_integer(UserInvestments::AmountCents).not_null())
                    .col(big_integer(UserInvestments::TokenAmount).not_null())
                    .col(string_len(UserInvestments::Status, 16).not_null())
                    .col(timestamp_with_time_zone(UserInvestments::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_investments_user")
                            .from(UserInvestments::Table, UserInvestments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_investments_deal")
                            .from(UserInvestments::Table, UserInvestments::DealId)
                            .to(Deals::Table, Deals::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserInvestments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserInvestments { Table, Id, UserId, DealId, AmountCents, TokenAmount, Status, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Deals { Table, Id }
