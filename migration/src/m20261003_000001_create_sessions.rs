use crate::m20261001_000001_create_users_and_profiles::Users;
use crate::m20261001_000002_create_connections::Connections;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::ConnectionId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::MentorId).string().not_null())
                    .col(ColumnDef::new(Sessions::MenteeId).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::DurationMinutes).integer().not_null())
                    .col(ColumnDef::new(Sessions::Topic).text().not_null())
                    .col(ColumnDef::new(Sessions::MeetingLink).text())
                    .col(
                        ColumnDef::new(Sessions::Status)
                            .text()
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_connection_id")
                            .from(Sessions::Table, Sessions::ConnectionId)
                            .to(Connections::Table, Connections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_mentor_id")
                            .from(Sessions::Table, Sessions::MentorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_mentee_id")
                            .from(Sessions::Table, Sessions::MenteeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A participant's agenda is listed by date
        manager
            .create_index(
                Index::create()
                    .name("sessions_mentor_scheduled_at")
                    .table(Sessions::Table)
                    .col(Sessions::MentorId)
                    .col(Sessions::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sessions_mentee_scheduled_at")
                    .table(Sessions::Table)
                    .col(Sessions::MenteeId)
                    .col(Sessions::ScheduledAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Sessions {
    Table,
    Id,
    ConnectionId,
    MentorId,
    MenteeId,
    ScheduledAt,
    DurationMinutes,
    Topic,
    MeetingLink,
    Status,
    CreatedAt,
    UpdatedAt,
}
