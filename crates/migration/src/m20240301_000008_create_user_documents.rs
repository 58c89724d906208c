//! Create `user_documents`. Files themselves live in object storage; only the path is kept.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserDocuments::Table)
                    .if_not_exists()
                    .col(uuid(UserDocuments::Id).primary_key())
                    .col(uuid(UserDocuments::UserId).not_null())
                    .col(string_len(UserDocuments::DocType, 32).not_null())
                    .col(string_len(UserDocuments::FileName, 255).not_null())
                    .col(string_len(UserDocuments::StoragePath, 512).not_null())
                    .col(string_len(UserDocuments::Status, 16).not_null())
                    .col(timestamp_with_time_zone(UserDocuments::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_documents_user")
                            .from(UserDocuments::Table, UserDocuments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserDocuments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserDocuments { Table, Id, UserId, DocType, FileName, StoragePath, Status, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
