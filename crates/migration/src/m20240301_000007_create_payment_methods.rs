use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(uuid(PaymentMethods::Id).primary_key())
                    .col(uuid(PaymentMethods::UserId).not_null())
                    .col(string_len(PaymentMethods::Kind, 16).not_null())
                    .col(string_len(PaymentMethods::Label, 64).not_null())
                    .col(string_len_null(PaymentMethods::Last4, 4))
                    .col(boolean(PaymentMethods::IsDefault).not_null().default(false))
                    .col(timestamp_with_time_zone(PaymentMethods::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_methods_user")
                            .from(PaymentMethods::Table, PaymentMethods::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PaymentMethods::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PaymentMethods { Table, Id, UserId, Kind, Label, Last4, IsDefault, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
