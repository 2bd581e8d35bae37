use crate::m20261001_000001_create_users_and_profiles::Users;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Applications::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Applications::MentorId).string().not_null())
                    .col(ColumnDef::new(Applications::MenteeId).string().not_null())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Applications::Message).text().not_null())
                    // NULL once rejected, so several rejected rows may share a pair.
                    .col(ColumnDef::new(Applications::OpenKey).string().unique_key())
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_mentor_id")
                            .from(Applications::Table, Applications::MentorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_mentee_id")
                            .from(Applications::Table, Applications::MenteeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Applications {
    Table,
    Id,
    MentorId,
    MenteeId,
    Status,
    Message,
    OpenKey,
    CreatedAt,
    UpdatedAt,
}
