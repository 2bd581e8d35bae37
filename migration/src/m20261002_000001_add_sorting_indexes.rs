use crate::m20261001_000002_create_connections::Connections;
use crate::m20261001_000003_create_applications::Applications;
use crate::m20261001_000004_create_chat_messages::ChatMessages;
use crate::m20261001_000005_create_notifications::Notifications;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Conversation history is read per connection in creation order
        manager
            .create_index(
                Index::create()
                    .name("chat_messages_connection_created_at")
                    .table(ChatMessages::Table)
                    .col(ChatMessages::ConnectionId)
                    .col(ChatMessages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Inbox listing and the retention sweep
        manager
            .create_index(
                Index::create()
                    .name("notifications_user_created_at")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("notifications_created_at")
                    .table(Notifications::Table)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("connections_mentee_id")
                    .table(Connections::Table)
                    .col(Connections::MenteeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("connections_mentor_id")
                    .table(Connections::Table)
                    .col(Connections::MentorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("applications_mentor_id")
                    .table(Applications::Table)
                    .col(Applications::MentorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("applications_mentor_id", "applications"),
            ("connections_mentor_id", "connections"),
            ("connections_mentee_id", "connections"),
            ("notifications_created_at", "notifications"),
            ("notifications_user_created_at", "notifications"),
            ("chat_messages_connection_created_at", "chat_messages"),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }

        Ok(())
    }
}
