use super::error::Error;
use entity::roles::Role;
use entity::users::{ActiveModel, Entity, Model};
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait};

pub async fn create(
    db: &impl ConnectionTrait,
    id: &str,
    email: &str,
    role: Role,
) -> Result<Model, Error> {
    debug!("Mirroring user {id} with role {role}");

    let now = super::now();
    let active_model = ActiveModel {
        id: Set(id.to_owned()),
        email: Set(email.to_owned()),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: &str) -> Result<Model, Error> {
    Entity::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn set_active(db: &impl ConnectionTrait, id: &str, is_active: bool) -> Result<Model, Error> {
    let user = find_by_id(db, id).await?;

    let mut active_model: ActiveModel = user.into();
    active_model.is_active = Set(is_active);
    active_model.updated_at = Set(super::now());

    Ok(active_model.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_model(id: &str) -> Model {
        let now = crate::now();
        Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            role: Role::Mentor,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_the_user() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model("u-1")]])
            .into_connection();

        let user = find_by_id(&db, "u-1").await?;

        assert_eq!(user.id, "u-1");
        assert_eq!(user.role, Role::Mentor);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_reports_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, "ghost").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
