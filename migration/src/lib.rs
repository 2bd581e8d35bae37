pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users_and_profiles;
mod m20261001_000002_create_connections;
mod m20261001_000003_create_applications;
mod m20261001_000004_create_chat_messages;
mod m20261001_000005_create_notifications;
mod m20261001_000006_create_matching_preferences;
mod m20261002_000001_add_sorting_indexes;
mod m20261003_000001_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users_and_profiles::Migration),
            Box::new(m20261001_000002_create_connections::Migration),
            Box::new(m20261001_000003_create_applications::Migration),
            Box::new(m20261001_000004_create_chat_messages::Migration),
            Box::new(m20261001_000005_create_notifications::Migration),
            Box::new(m20261001_000006_create_matching_preferences::Migration),
            Box::new(m20261002_000001_add_sorting_indexes::Migration),
            Box::new(m20261003_000001_create_sessions::Migration),
        ]
    }
}
