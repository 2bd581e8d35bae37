//! Mentorship sessions booked on a connection.
//!
//! Either participant may book, reschedule, cancel or complete a session;
//! the other participant is notified each time.

use crate::connection::find_for_participant;
use crate::error::Error;
use crate::notification::notify;
use chrono::{DateTime, Utc};
use entity::notification_type::NotificationType;
use entity::session_status::SessionStatus;
use entity::sessions::Model;
use entity::Id;
use entity_api::error::EntityApiErrorKind;
use events::EventPublisher;
use log::*;
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use utoipa::ToSchema;

const MIN_DURATION_MINUTES: i32 = 30;
const MAX_DURATION_MINUTES: i32 = 180;

/// A session to book on one of the caller's connections.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct NewSession {
    #[schema(value_type = String, format = Uuid)]
    pub connection_id: Id,
    #[schema(value_type = String, format = DateTime)]
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub topic: String,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

/// A status change. `reschedule_at` moves an upcoming session to a new date.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct SessionUpdate {
    pub status: SessionStatus,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub reschedule_at: Option<DateTime<Utc>>,
}

fn ensure_in_future(at: DateTime<Utc>) -> Result<(), Error> {
    if at <= Utc::now() {
        return Err(Error::invalid("session date must be in the future"));
    }
    Ok(())
}

/// Books a session on a connection the caller takes part in.
pub async fn create(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    new_session: NewSession,
) -> Result<Model, Error> {
    if new_session.topic.trim().is_empty() {
        return Err(Error::invalid("topic must not be blank"));
    }
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&new_session.duration_minutes) {
        return Err(Error::invalid(format!(
            "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
        )));
    }
    ensure_in_future(new_session.scheduled_at)?;

    let connection = find_for_participant(db, user_id, new_session.connection_id).await?;

    let session = entity_api::session::create(
        db,
        &connection,
        new_session.scheduled_at.into(),
        new_session.duration_minutes,
        new_session.topic,
        new_session.meeting_link,
    )
    .await?;

    info!(
        "Session {} booked on connection {} by {user_id}",
        session.id, connection.id
    );

    if let Some(other) = session.counterpart_of(user_id) {
        notify(
            db,
            publisher,
            other,
            NotificationType::SessionScheduled,
            format!(
                "New session scheduled for {}",
                new_session.scheduled_at.format("%Y-%m-%d")
            ),
        )
        .await;
    }

    Ok(session)
}

/// Sessions the user takes part in, latest date first.
pub async fn list_for_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(entity_api::session::find_by_user(db, user_id).await?)
}

/// Cancels, completes or reschedules an upcoming session.
pub async fn update_status(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    session_id: Id,
    update: SessionUpdate,
) -> Result<Model, Error> {
    let session = entity_api::session::find_by_id(db, session_id)
        .await
        .map_err(|err| match err.error_kind {
            EntityApiErrorKind::RecordNotFound => Error::not_found("session"),
            _ => err.into(),
        })?;

    if !session.is_participant(user_id) {
        return Err(Error::forbidden("not a participant of this session"));
    }
    if session.status.is_final() {
        return Err(Error::invalid(format!("session is already {}", session.status)));
    }

    match (update.status, update.reschedule_at) {
        (SessionStatus::Upcoming, None) => {
            return Err(Error::invalid("a new date is required to reschedule"));
        }
        (SessionStatus::Upcoming, Some(at)) => ensure_in_future(at)?,
        (_, Some(_)) => {
            return Err(Error::invalid("only an upcoming session can be rescheduled"));
        }
        (_, None) => {}
    }

    let updated = entity_api::session::update_status(
        db,
        session_id,
        update.status,
        update.reschedule_at.map(Into::into),
    )
    .await?;

    info!("Session {session_id} is now {} after update by {user_id}", updated.status);

    let content = match (updated.status, update.reschedule_at) {
        (SessionStatus::Upcoming, Some(at)) => {
            format!("Session rescheduled to {}", at.format("%Y-%m-%d"))
        }
        (status, _) => format!("Session {status}"),
    };
    if let Some(other) = updated.counterpart_of(user_id) {
        notify(db, publisher, other, NotificationType::SessionUpdated, content).await;
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use crate::role::RequestType;
    use crate::test_support::{add_user, setup_db};
    use chrono::Duration;
    use entity::connections;
    use entity::roles::Role;
    use sea_orm::DatabaseConnection;

    async fn connected_pair(db: &DatabaseConnection) -> connections::Model {
        add_user(db, "mentee", Role::Mentee, 1, &["rust"]).await;
        add_user(db, "mentor", Role::Mentor, 10, &["rust"]).await;
        crate::connection::create(
            db,
            &EventPublisher::new(),
            "mentee",
            "mentor",
            RequestType::MentorRequest,
        )
        .await
        .unwrap()
    }

    fn new_session(connection_id: Id, days_ahead: i64) -> NewSession {
        NewSession {
            connection_id,
            scheduled_at: Utc::now() + Duration::days(days_ahead),
            duration_minutes: 60,
            topic: "Reading a flame graph".to_string(),
            meeting_link: Some("https://meet.example.com/abc".to_string()),
        }
    }

    async fn inbox(db: &DatabaseConnection, user_id: &str) -> Vec<entity::notifications::Model> {
        crate::notification::list(db, user_id).await.unwrap()
    }

    #[tokio::test]
    async fn booking_notifies_only_the_other_participant() -> Result<(), Error> {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        let mentor_before = inbox(&db, "mentor").await.len();
        let mentee_before = inbox(&db, "mentee").await.len();

        let session = create(
            &db,
            &EventPublisher::new(),
            "mentee",
            new_session(connection.id, 3),
        )
        .await?;

        assert_eq!(session.status, SessionStatus::Upcoming);
        assert_eq!(session.mentor_id, "mentor");
        assert_eq!(session.mentee_id, "mentee");

        let mentor_inbox = inbox(&db, "mentor").await;
        assert_eq!(mentor_inbox.len(), mentor_before + 1);
        assert_eq!(
            mentor_inbox[0].notification_type,
            NotificationType::SessionScheduled
        );
        assert_eq!(inbox(&db, "mentee").await.len(), mentee_before);

        for participant in ["mentor", "mentee"] {
            let listed = list_for_user(&db, participant).await?;
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id, session.id);
        }
        Ok(())
    }

    #[tokio::test]
    async fn outsiders_and_unknown_connections_are_refused() {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        add_user(&db, "outsider", Role::Mentor, 4, &[]).await;
        let publisher = EventPublisher::new();

        let err = create(&db, &publisher, "outsider", new_session(connection.id, 2))
            .await
            .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::Forbidden(_)));

        let err = create(&db, &publisher, "mentee", new_session(Id::new_v4(), 2))
            .await
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::NotFound("connection".to_string())
        );
    }

    #[tokio::test]
    async fn booking_validates_date_duration_and_topic() {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        let publisher = EventPublisher::new();

        let past = new_session(connection.id, -1);
        let mut too_short = new_session(connection.id, 1);
        too_short.duration_minutes = 20;
        let mut too_long = new_session(connection.id, 1);
        too_long.duration_minutes = 181;
        let mut blank_topic = new_session(connection.id, 1);
        blank_topic.topic = "  ".to_string();

        for invalid in [past, too_short, too_long, blank_topic] {
            let err = create(&db, &publisher, "mentee", invalid).await.unwrap_err();
            assert!(matches!(err.error_kind, DomainErrorKind::InvalidArgument(_)));
        }
        assert!(list_for_user(&db, "mentee").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_notifies_the_other_participant_and_is_final() -> Result<(), Error> {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        let publisher = EventPublisher::new();
        let session = create(&db, &publisher, "mentee", new_session(connection.id, 5)).await?;
        let mentee_before = inbox(&db, "mentee").await.len();
        let mentor_before = inbox(&db, "mentor").await.len();

        let cancelled = update_status(
            &db,
            &publisher,
            "mentor",
            session.id,
            SessionUpdate {
                status: SessionStatus::Cancelled,
                reschedule_at: None,
            },
        )
        .await?;
        assert_eq!(cancelled.status, SessionStatus::Cancelled);

        let mentee_inbox = inbox(&db, "mentee").await;
        assert_eq!(mentee_inbox.len(), mentee_before + 1);
        assert_eq!(
            mentee_inbox[0].notification_type,
            NotificationType::SessionUpdated
        );
        assert_eq!(mentee_inbox[0].content, "Session cancelled");
        assert_eq!(inbox(&db, "mentor").await.len(), mentor_before);

        let err = update_status(
            &db,
            &publisher,
            "mentee",
            session.id,
            SessionUpdate {
                status: SessionStatus::Completed,
                reschedule_at: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::InvalidArgument(_)));
        Ok(())
    }

    #[tokio::test]
    async fn reschedule_moves_the_date_and_requires_one() -> Result<(), Error> {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        let publisher = EventPublisher::new();
        let session = create(&db, &publisher, "mentee", new_session(connection.id, 2)).await?;

        let err = update_status(
            &db,
            &publisher,
            "mentee",
            session.id,
            SessionUpdate {
                status: SessionStatus::Upcoming,
                reschedule_at: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::InvalidArgument(_)));

        let new_date = Utc::now() + Duration::days(9);
        let moved = update_status(
            &db,
            &publisher,
            "mentee",
            session.id,
            SessionUpdate {
                status: SessionStatus::Upcoming,
                reschedule_at: Some(new_date),
            },
        )
        .await?;

        assert_eq!(moved.status, SessionStatus::Upcoming);
        assert_eq!(moved.scheduled_at.timestamp(), new_date.timestamp());
        let mentor_inbox = inbox(&db, "mentor").await;
        assert!(mentor_inbox[0].content.starts_with("Session rescheduled to "));
        Ok(())
    }

    #[tokio::test]
    async fn updates_are_participant_only() -> Result<(), Error> {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        add_user(&db, "outsider", Role::Mentee, 1, &[]).await;
        let publisher = EventPublisher::new();
        let session = create(&db, &publisher, "mentor", new_session(connection.id, 2)).await?;

        let err = update_status(
            &db,
            &publisher,
            "outsider",
            session.id,
            SessionUpdate {
                status: SessionStatus::Cancelled,
                reschedule_at: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::Forbidden(_)));

        let err = update_status(
            &db,
            &publisher,
            "mentor",
            Id::new_v4(),
            SessionUpdate {
                status: SessionStatus::Cancelled,
                reschedule_at: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::NotFound("session".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn agenda_lists_latest_date_first() -> Result<(), Error> {
        let db = setup_db().await;
        let connection = connected_pair(&db).await;
        let publisher = EventPublisher::new();
        let soon = create(&db, &publisher, "mentee", new_session(connection.id, 1)).await?;
        let later = create(&db, &publisher, "mentee", new_session(connection.id, 7)).await?;

        let ids: Vec<_> = list_for_user(&db, "mentor")
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![later.id, soon.id]);
        Ok(())
    }
}
