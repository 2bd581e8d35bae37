//! Fixtures shared by the domain tests: a fresh in-memory SQLite database
//! with every migration applied, and helpers that mirror users into it.

use entity::roles::Role;
use entity::{profiles, UserId};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub(crate) async fn setup_db() -> DatabaseConnection {
    // One connection, otherwise every pooled connection sees its own empty database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("open in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub(crate) async fn add_user(
    db: &DatabaseConnection,
    id: &str,
    role: Role,
    years_experience: i32,
    skills: &[&str],
) -> UserId {
    entity_api::user::create(db, id, &format!("{id}@example.com"), role)
        .await
        .expect("create user");

    let now = chrono::Utc::now().into();
    entity_api::profile::upsert(
        db,
        profiles::Model {
            user_id: id.to_string(),
            full_name: id.to_uppercase(),
            industry: Some("software".to_string()),
            years_experience,
            skills: skills
                .iter()
                .map(|skill| skill.to_string())
                .collect::<Vec<_>>()
                .into(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("create profile");

    id.to_string()
}
