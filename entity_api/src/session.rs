use super::error::Error;
use entity::connections;
use entity::session_status::SessionStatus;
use entity::sessions::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set},
    Condition, ConnectionTrait, QueryOrder,
};

/// Books an `upcoming` session on a connection, copying its participants.
pub async fn create(
    db: &impl ConnectionTrait,
    connection: &connections::Model,
    scheduled_at: DateTimeWithTimeZone,
    duration_minutes: i32,
    topic: String,
    meeting_link: Option<String>,
) -> Result<Model, Error> {
    debug!(
        "New session to be inserted on connection {} at {scheduled_at}",
        connection.id
    );

    let now = super::now();
    let active_model = ActiveModel {
        id: Set(Id::new_v4()),
        connection_id: Set(connection.id),
        mentor_id: Set(connection.mentor_id.clone()),
        mentee_id: Set(connection.mentee_id.clone()),
        scheduled_at: Set(scheduled_at),
        duration_minutes: Set(duration_minutes),
        topic: Set(topic),
        meeting_link: Set(meeting_link),
        status: Set(SessionStatus::Upcoming),
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

/// Sessions the user takes part in, latest date first.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(Column::MentorId.eq(user_id))
                .add(Column::MenteeId.eq(user_id)),
        )
        .order_by_desc(Column::ScheduledAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Moves an `upcoming` session to `status`, optionally to a new date.
///
/// Fails with `RecordNotUpdated` when the session is no longer upcoming.
pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    status: SessionStatus,
    scheduled_at: Option<DateTimeWithTimeZone>,
) -> Result<Model, Error> {
    debug!("Updating session {id} to {status}");

    let result = Entity::update_many()
        .set(ActiveModel {
            status: Set(status),
            scheduled_at: scheduled_at.map_or(NotSet, Set),
            updated_at: Set(super::now()),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(SessionStatus::Upcoming))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Session {id} is no longer upcoming; nothing updated");
        return Err(Error::not_updated());
    }

    find_by_id(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn session_model(status: SessionStatus) -> Model {
        let now = crate::now();
        Model {
            id: Id::new_v4(),
            connection_id: Id::new_v4(),
            mentor_id: "mentor".to_string(),
            mentee_id: "mentee".to_string(),
            scheduled_at: now,
            duration_minutes: 45,
            topic: "Career planning".to_string(),
            meeting_link: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn update_status_returns_the_updated_session() -> Result<(), Error> {
        let cancelled = session_model(SessionStatus::Cancelled);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results(vec![vec![cancelled.clone()]])
            .into_connection();

        let session = update_status(&db, cancelled.id, SessionStatus::Cancelled, None).await?;

        assert_eq!(session.status, SessionStatus::Cancelled);
        Ok(())
    }

    #[tokio::test]
    async fn update_status_reports_sessions_that_are_no_longer_upcoming() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = update_status(&db, Id::new_v4(), SessionStatus::Completed, None).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotUpdated
        );
    }
}
