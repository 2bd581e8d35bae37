use super::error::Error;
use entity::profiles::{self, ActiveModel, Entity, Model};
use entity::roles::Role;
use entity::users;
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::OnConflict, ActiveValue::Set, ConnectionTrait, QueryOrder,
};

/// Which side of the seeker's experience a candidate must sit on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExperienceBound {
    /// Strictly more years than the given value.
    Above(i32),
    /// Strictly fewer years than the given value.
    Below(i32),
}

pub async fn find_by_user_id(db: &impl ConnectionTrait, user_id: &str) -> Result<Model, Error> {
    Entity::find_by_id(user_id.to_owned())
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Inserts a profile or replaces every attribute of an existing one.
pub async fn upsert(db: &impl ConnectionTrait, model: Model) -> Result<Model, Error> {
    debug!("Upserting profile for user {}", model.user_id);

    let now = super::now();
    let active_model = ActiveModel {
        user_id: Set(model.user_id.clone()),
        full_name: Set(model.full_name),
        industry: Set(model.industry),
        years_experience: Set(model.years_experience),
        skills: Set(model.skills),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Entity::insert(active_model)
        .on_conflict(
            OnConflict::column(profiles::Column::UserId)
                .update_columns([
                    profiles::Column::FullName,
                    profiles::Column::Industry,
                    profiles::Column::YearsExperience,
                    profiles::Column::Skills,
                    profiles::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    find_by_user_id(db, &model.user_id).await
}

/// Active users in one of `roles`, other than `seeker_id`, whose profile
/// experience satisfies `bound`. Users without a profile are never returned.
///
/// Rows come back ordered by user creation time, then id, which gives
/// callers a deterministic order to break score ties with.
pub async fn find_candidates(
    db: &impl ConnectionTrait,
    seeker_id: &str,
    roles: &[Role],
    bound: ExperienceBound,
) -> Result<Vec<(users::Model, Model)>, Error> {
    let experience = match bound {
        ExperienceBound::Above(years) => profiles::Column::YearsExperience.gt(years),
        ExperienceBound::Below(years) => profiles::Column::YearsExperience.lt(years),
    };

    let rows = users::Entity::find()
        .find_also_related(Entity)
        .filter(users::Column::Id.ne(seeker_id))
        .filter(users::Column::IsActive.eq(true))
        .filter(users::Column::Role.is_in(roles.iter().copied()))
        .filter(experience)
        .order_by_asc(users::Column::CreatedAt)
        .order_by_asc(users::Column::Id)
        .all(db)
        .await?;

    debug!("Found {} candidate(s) for {seeker_id}", rows.len());

    Ok(rows
        .into_iter()
        .filter_map(|(user, profile)| profile.map(|profile| (user, profile)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn profile(user_id: &str, years: i32) -> Model {
        let now = crate::now();
        Model {
            user_id: user_id.to_string(),
            full_name: "Test Person".to_string(),
            industry: Some("software".to_string()),
            years_experience: years,
            skills: ["rust", "sql"].into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn find_by_user_id_returns_profile() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![profile("u-1", 4)]])
            .into_connection();

        let found = find_by_user_id(&db, "u-1").await?;

        assert_eq!(found.years_experience, 4);
        assert_eq!(found.skills.0, vec!["rust".to_string(), "sql".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_user_id_reports_missing_profile() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_user_id(&db, "nobody").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn find_candidates_returns_empty_pool_when_nothing_matches() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<users::Model>::new()])
            .into_connection();

        let candidates = find_candidates(
            &db,
            "seeker",
            &[Role::Mentor, Role::Both],
            ExperienceBound::Above(3),
        )
        .await?;

        assert!(candidates.is_empty());
        Ok(())
    }
}
