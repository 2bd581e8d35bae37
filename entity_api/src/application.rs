use super::error::Error;
use entity::application_status::ApplicationStatus;
use entity::applications::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set},
    Condition, ConnectionTrait, QueryOrder,
};

/// Inserts a new `pending` application.
///
/// Fails with `RecordConflict` while another pending or accepted application
/// exists for the same mentor and mentee.
pub async fn create(
    db: &impl ConnectionTrait,
    mentor_id: &str,
    mentee_id: &str,
    message: String,
) -> Result<Model, Error> {
    debug!("New application to be inserted: mentee {mentee_id} -> mentor {mentor_id}");

    let now = super::now();
    let active_model = ActiveModel {
        id: Set(Id::new_v4()),
        mentor_id: Set(mentor_id.to_owned()),
        mentee_id: Set(mentee_id.to_owned()),
        status: Set(ApplicationStatus::Pending),
        message: Set(message),
        open_key: Set(Some(Model::open_key_for(mentor_id, mentee_id))),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Applications the user sent or received, newest first.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(Column::MentorId.eq(user_id))
                .add(Column::MenteeId.eq(user_id)),
        )
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Resolves a pending application. A rejection releases the pair so the
/// mentee may apply again later.
pub async fn resolve(
    db: &impl ConnectionTrait,
    id: Id,
    status: ApplicationStatus,
) -> Result<Model, Error> {
    debug!("Resolving application {id} as {status}");

    let open_key = match status {
        ApplicationStatus::Rejected => Set(None),
        _ => NotSet,
    };

    let result = Entity::update_many()
        .set(ActiveModel {
            status: Set(status),
            open_key,
            updated_at: Set(super::now()),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(ApplicationStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Application {id} is no longer pending; nothing updated");
        return Err(Error::not_updated());
    }

    find_by_id(db, id).await
}

/// Deletes an application that is still pending.
pub async fn delete_pending(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(ApplicationStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_updated());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn application_model(status: ApplicationStatus) -> Model {
        let now = crate::now();
        Model {
            id: Id::new_v4(),
            mentor_id: "mentor".to_string(),
            mentee_id: "mentee".to_string(),
            status,
            message: "I would love to learn from you".to_string(),
            open_key: Some(Model::open_key_for("mentor", "mentee")),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_returns_a_pending_application() -> Result<(), Error> {
        let model = application_model(ApplicationStatus::Pending);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let application = create(&db, "mentor", "mentee", model.message.clone()).await?;

        assert_eq!(application.id, model.id);
        assert_eq!(application.status, ApplicationStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn resolve_returns_the_resolved_application() -> Result<(), Error> {
        let mut resolved = application_model(ApplicationStatus::Rejected);
        resolved.open_key = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results(vec![vec![resolved.clone()]])
            .into_connection();

        let application = resolve(&db, resolved.id, ApplicationStatus::Rejected).await?;

        assert_eq!(application.status, ApplicationStatus::Rejected);
        assert_eq!(application.open_key, None);
        Ok(())
    }

    #[tokio::test]
    async fn delete_pending_reports_non_pending_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete_pending(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotUpdated
        );
    }
}
