use super::error::Error;
use entity::matching_preferences::{self, ActiveModel, Entity, Model};
use log::*;
use sea_orm::{entity::prelude::*, sea_query::OnConflict, ActiveValue::Set, ConnectionTrait};

pub async fn find_by_user_id(
    db: &impl ConnectionTrait,
    user_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id(user_id.to_owned()).one(db).await?)
}

/// Creates or fully replaces a user's matching preferences.
pub async fn upsert(db: &impl ConnectionTrait, model: Model) -> Result<Model, Error> {
    debug!("Upserting matching preferences for {}", model.user_id);

    let now = super::now();
    let user_id = model.user_id.clone();
    let active_model = ActiveModel {
        user_id: Set(model.user_id),
        preferred_industries: Set(model.preferred_industries),
        min_experience: Set(model.min_experience),
        max_experience: Set(model.max_experience),
        preferred_meeting_frequency: Set(model.preferred_meeting_frequency),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Entity::insert(active_model)
        .on_conflict(
            OnConflict::column(matching_preferences::Column::UserId)
                .update_columns([
                    matching_preferences::Column::PreferredIndustries,
                    matching_preferences::Column::MinExperience,
                    matching_preferences::Column::MaxExperience,
                    matching_preferences::Column::PreferredMeetingFrequency,
                    matching_preferences::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    find_by_user_id(db, &user_id)
        .await?
        .ok_or_else(Error::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_by_user_id_returns_none_without_saved_preferences() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        assert_eq!(find_by_user_id(&db, "u-1").await?, None);
        Ok(())
    }
}
