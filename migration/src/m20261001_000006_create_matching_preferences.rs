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
                    .table(MatchingPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchingPreferences::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MatchingPreferences::PreferredIndustries)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchingPreferences::MinExperience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MatchingPreferences::MaxExperience)
                            .integer()
                            .not_null()
                            .default(999),
                    )
                    .col(
                        ColumnDef::new(MatchingPreferences::PreferredMeetingFrequency)
                            .string()
                            .not_null()
                            .default("weekly"),
                    )
                    .col(
                        ColumnDef::new(MatchingPreferences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchingPreferences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matching_preferences_user_id")
                            .from(MatchingPreferences::Table, MatchingPreferences::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MatchingPreferences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MatchingPreferences {
    Table,
    UserId,
    PreferredIndustries,
    MinExperience,
    MaxExperience,
    PreferredMeetingFrequency,
    CreatedAt,
    UpdatedAt,
}
