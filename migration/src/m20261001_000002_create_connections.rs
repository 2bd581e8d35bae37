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
                    .table(Connections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Connections::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Connections::MentorId).string().not_null())
                    .col(ColumnDef::new(Connections::MenteeId).string().not_null())
                    .col(ColumnDef::new(Connections::PairLowId).string().not_null())
                    .col(ColumnDef::new(Connections::PairHighId).string().not_null())
                    .col(
                        ColumnDef::new(Connections::Status)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Connections::Goals).json().not_null())
                    .col(ColumnDef::new(Connections::ProgressNotes).text())
                    .col(ColumnDef::new(Connections::LastMessageAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Connections::LastMessagePreview).text())
                    .col(
                        ColumnDef::new(Connections::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Connections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connections::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connections_mentor_id")
                            .from(Connections::Table, Connections::MentorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connections_mentee_id")
                            .from(Connections::Table, Connections::MenteeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One connection per unordered pair of users, whatever its status.
        manager
            .create_index(
                Index::create()
                    .name("connections_unique_pair")
                    .table(Connections::Table)
                    .col(Connections::PairLowId)
                    .col(Connections::PairHighId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Connections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Connections {
    Table,
    Id,
    MentorId,
    MenteeId,
    PairLowId,
    PairHighId,
    Status,
    Goals,
    ProgressNotes,
    LastMessageAt,
    LastMessagePreview,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
