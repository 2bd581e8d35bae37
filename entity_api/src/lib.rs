use chrono::Utc;
use log::info;
use sea_orm::{ConnectionTrait, DbErr};

pub use entity::{
    application_status, applications, chat_messages, connection_status, connections, goals,
    matching_preferences, notification_type, notifications, profiles, roles, session_status,
    sessions, string_list, users, Id, UserId,
};

pub mod application;
pub mod chat_message;
pub mod connection;
pub mod error;
pub mod matching_preference;
pub mod notification;
pub mod profile;
pub mod session;
pub mod user;

pub(crate) fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

/// Inserts a small directory of demo users and profiles for local development.
pub async fn seed_database(db: &impl ConnectionTrait) -> Result<(), DbErr> {
    let people: [(&str, &str, roles::Role, &str, Option<&str>, i32, &[&str]); 5] = [
        (
            "seed-mentor-ada",
            "ada@example.com",
            roles::Role::Mentor,
            "Ada Byron",
            Some("software"),
            14,
            &["rust", "sql", "distributed systems"],
        ),
        (
            "seed-mentor-grace",
            "grace@example.com",
            roles::Role::Mentor,
            "Grace Hopper",
            Some("software"),
            9,
            &["compilers", "go", "sql"],
        ),
        (
            "seed-both-linus",
            "linus@example.com",
            roles::Role::Both,
            "Linus Park",
            Some("infrastructure"),
            6,
            &["linux", "go", "kubernetes"],
        ),
        (
            "seed-mentee-sam",
            "sam@example.com",
            roles::Role::Mentee,
            "Sam Rivera",
            Some("software"),
            2,
            &["go", "sql"],
        ),
        (
            "seed-mentee-kim",
            "kim@example.com",
            roles::Role::Mentee,
            "Kim Osei",
            Some("data"),
            1,
            &["python", "sql"],
        ),
    ];

    for (id, email, role, full_name, industry, years, skills) in people {
        let user = user::create(db, id, email, role)
            .await
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        profile::upsert(
            db,
            profiles::Model {
                user_id: user.id.clone(),
                full_name: full_name.to_string(),
                industry: industry.map(str::to_string),
                years_experience: years,
                skills: skills.iter().map(|s| s.to_string()).collect::<Vec<_>>().into(),
                created_at: now(),
                updated_at: now(),
            },
        )
        .await
        .map_err(|e| DbErr::Custom(e.to_string()))?;
        info!("Seeded {role} {email}");
    }

    Ok(())
}
