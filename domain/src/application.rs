//! Mentorship applications: a mentee asks a mentor, the mentor decides.
//!
//! Accepting an application opens a `pending` connection between the two in
//! the same transaction. A rejected application frees the pair so the mentee
//! may apply again.

use crate::connection::find_active_user;
use crate::error::Error;
use crate::notification::notify;
use crate::role::{ensure_compatible, RequestType};
use entity::application_status::ApplicationStatus;
use entity::applications::Model;
use entity::connections;
use entity::notification_type::NotificationType;
use entity::Id;
use entity_api::error::EntityApiErrorKind;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};

const MIN_MESSAGE_CHARS: usize = 10;
const MAX_MESSAGE_CHARS: usize = 500;

/// Files an application from `mentee_id` to `mentor_id`.
pub async fn create(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    mentee_id: &str,
    mentor_id: &str,
    message: String,
) -> Result<Model, Error> {
    let length = message.chars().count();
    if !(MIN_MESSAGE_CHARS..=MAX_MESSAGE_CHARS).contains(&length) {
        return Err(Error::invalid(format!(
            "message must be between {MIN_MESSAGE_CHARS} and {MAX_MESSAGE_CHARS} characters"
        )));
    }
    if mentee_id == mentor_id {
        return Err(Error::invalid("cannot apply to yourself"));
    }

    let mentee = find_active_user(db, mentee_id).await?;
    let mentor = find_active_user(db, mentor_id).await?;
    ensure_compatible(mentee.role, mentor.role, RequestType::MentorRequest)?;

    let application = entity_api::application::create(db, mentor_id, mentee_id, message)
        .await
        .map_err(|err| match err.error_kind {
            EntityApiErrorKind::RecordConflict => {
                Error::conflict("An open application to this mentor already exists")
            }
            _ => err.into(),
        })?;

    info!(
        "Application {} filed by {mentee_id} to {mentor_id}",
        application.id
    );

    notify(
        db,
        publisher,
        mentor_id,
        NotificationType::ApplicationReceived,
        format!("New mentorship application from {}", mentee.email),
    )
    .await;
    publish_updated(publisher, &application).await;

    Ok(application)
}

async fn find(db: &impl ConnectionTrait, application_id: Id) -> Result<Model, Error> {
    entity_api::application::find_by_id(db, application_id)
        .await
        .map_err(|err| match err.error_kind {
            EntityApiErrorKind::RecordNotFound => Error::not_found("application"),
            _ => err.into(),
        })
}

/// Accepts or rejects a pending application. Only the addressed mentor may.
pub async fn update_status(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    user_id: &str,
    application_id: Id,
    status: ApplicationStatus,
) -> Result<Model, Error> {
    let application = find(db, application_id).await?;

    if application.mentor_id != user_id {
        return Err(Error::forbidden(
            "only the addressed mentor may decide on this application",
        ));
    }
    if status == ApplicationStatus::Pending {
        return Err(Error::invalid("status must be accepted or rejected"));
    }
    if application.status != ApplicationStatus::Pending {
        return Err(Error::invalid(format!(
            "application is already {}",
            application.status
        )));
    }

    let txn = db.begin().await?;
    let (resolved, connection) = match resolve_in(&txn, &application, status).await {
        Ok(outcome) => {
            txn.commit().await?;
            outcome
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("Failed to roll back application {application_id}: {rollback_err}");
            }
            return Err(err);
        }
    };

    info!("Application {application_id} is now {status}");

    let notification_type = match status {
        ApplicationStatus::Accepted => NotificationType::ApplicationAccepted,
        _ => NotificationType::ApplicationRejected,
    };
    notify(
        db,
        publisher,
        &resolved.mentee_id,
        notification_type,
        format!("Your mentorship application has been {status}"),
    )
    .await;
    publish_updated(publisher, &resolved).await;
    if let Some(connection) = &connection {
        crate::connection::publish_updated(publisher, connection).await;
    }

    Ok(resolved)
}

/// Resolves the application and, on acceptance, opens the connection.
async fn resolve_in(
    txn: &DatabaseTransaction,
    application: &Model,
    status: ApplicationStatus,
) -> Result<(Model, Option<connections::Model>), Error> {
    let resolved = entity_api::application::resolve(txn, application.id, status).await?;

    if status != ApplicationStatus::Accepted {
        return Ok((resolved, None));
    }

    let connection =
        entity_api::connection::create(txn, &application.mentor_id, &application.mentee_id)
            .await
            .map_err(|err| match err.error_kind {
                EntityApiErrorKind::RecordConflict => {
                    Error::conflict("A connection between these users already exists")
                }
                _ => err.into(),
            })?;

    Ok((resolved, Some(connection)))
}

/// Withdraws a pending application. Only the applicant may.
pub async fn cancel(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    application_id: Id,
) -> Result<(), Error> {
    let application = find(db, application_id).await?;

    if application.mentee_id != user_id {
        return Err(Error::forbidden("only the applicant may cancel"));
    }
    if application.status != ApplicationStatus::Pending {
        return Err(Error::invalid(format!(
            "application is already {}",
            application.status
        )));
    }

    entity_api::application::delete_pending(db, application_id).await?;

    info!("Application {application_id} cancelled by {user_id}");

    notify(
        db,
        publisher,
        &application.mentor_id,
        NotificationType::ApplicationCancelled,
        "A mentorship application has been cancelled",
    )
    .await;
    publisher
        .publish(DomainEvent::ApplicationUpdated {
            application_id,
            application: None,
            notify_user_ids: vec![application.mentor_id, application.mentee_id],
        })
        .await;

    Ok(())
}

/// Applications the user sent or received, newest first.
pub async fn list_for_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(entity_api::application::find_by_user(db, user_id).await?)
}

async fn publish_updated(publisher: &EventPublisher, application: &Model) {
    match serde_json::to_value(application) {
        Ok(value) => {
            publisher
                .publish(DomainEvent::ApplicationUpdated {
                    application_id: application.id,
                    application: Some(value),
                    notify_user_ids: vec![
                        application.mentor_id.clone(),
                        application.mentee_id.clone(),
                    ],
                })
                .await
        }
        Err(err) => warn!("Failed to serialize application {}: {err}", application.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use crate::test_support::{add_user, setup_db};
    use entity::connection_status::ConnectionStatus;
    use entity::roles::Role;

    const MESSAGE: &str = "I would love your help with system design.";

    async fn mentee_and_mentor(db: &DatabaseConnection) {
        add_user(db, "m1", Role::Mentee, 2, &["js"]).await;
        add_user(db, "t1", Role::Mentor, 8, &["js"]).await;
    }

    #[tokio::test]
    async fn create_notifies_the_mentor() -> Result<(), Error> {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;

        let application = create(
            &db,
            &EventPublisher::new(),
            "m1",
            "t1",
            MESSAGE.to_string(),
        )
        .await?;

        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.mentor_id, "t1");

        let inbox = crate::notification::list(&db, "t1").await?;
        assert_eq!(inbox[0].notification_type, NotificationType::ApplicationReceived);
        assert_eq!(
            inbox[0].content,
            "New mentorship application from m1@example.com"
        );
        Ok(())
    }

    #[tokio::test]
    async fn message_length_is_bounded() {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;
        let publisher = EventPublisher::new();

        for message in ["too short".to_string(), "x".repeat(501)] {
            let err = create(&db, &publisher, "m1", "t1", message)
                .await
                .unwrap_err();
            assert!(matches!(err.error_kind, DomainErrorKind::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn mentor_cannot_be_applied_to_by_another_mentor() {
        let db = setup_db().await;
        add_user(&db, "t1", Role::Mentor, 8, &[]).await;
        add_user(&db, "t2", Role::Mentor, 12, &[]).await;

        let err = create(
            &db,
            &EventPublisher::new(),
            "t1",
            "t2",
            MESSAGE.to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.error_kind, DomainErrorKind::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn second_open_application_conflicts_until_rejected() -> Result<(), Error> {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;
        let publisher = EventPublisher::new();

        let first = create(&db, &publisher, "m1", "t1", MESSAGE.to_string()).await?;
        let err = create(&db, &publisher, "m1", "t1", MESSAGE.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::Conflict(_)));

        update_status(&db, &publisher, "t1", first.id, ApplicationStatus::Rejected).await?;

        let again = create(&db, &publisher, "m1", "t1", MESSAGE.to_string()).await?;
        assert_ne!(again.id, first.id);
        Ok(())
    }

    #[tokio::test]
    async fn only_the_mentor_may_decide() {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;
        let publisher = EventPublisher::new();
        let application = create(&db, &publisher, "m1", "t1", MESSAGE.to_string())
            .await
            .unwrap();

        let err = update_status(
            &db,
            &publisher,
            "m1",
            application.id,
            ApplicationStatus::Accepted,
        )
        .await
        .unwrap_err();

        assert!(matches!(err.error_kind, DomainErrorKind::Forbidden(_)));
    }

    #[tokio::test]
    async fn accepting_opens_exactly_one_pending_connection() -> Result<(), Error> {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;
        let publisher = EventPublisher::new();
        let application = create(&db, &publisher, "m1", "t1", MESSAGE.to_string()).await?;

        let accepted = update_status(
            &db,
            &publisher,
            "t1",
            application.id,
            ApplicationStatus::Accepted,
        )
        .await?;
        assert_eq!(accepted.status, ApplicationStatus::Accepted);

        let connections = crate::connection::list_for_user(&db, "m1").await?;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].mentor_id, "t1");
        assert_eq!(connections[0].mentee_id, "m1");
        assert_eq!(connections[0].status, ConnectionStatus::Pending);

        let inbox = crate::notification::list(&db, "m1").await?;
        assert_eq!(inbox[0].notification_type, NotificationType::ApplicationAccepted);
        assert_eq!(
            inbox[0].content,
            "Your mentorship application has been accepted"
        );

        let err = update_status(
            &db,
            &publisher,
            "t1",
            application.id,
            ApplicationStatus::Rejected,
        )
        .await
        .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::InvalidArgument(_)));
        Ok(())
    }

    #[tokio::test]
    async fn accepting_rolls_back_when_pair_is_already_connected() -> Result<(), Error> {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;
        let publisher = EventPublisher::new();
        crate::connection::create(&db, &publisher, "m1", "t1", RequestType::MentorRequest)
            .await?;
        let application = create(&db, &publisher, "m1", "t1", MESSAGE.to_string()).await?;

        let err = update_status(
            &db,
            &publisher,
            "t1",
            application.id,
            ApplicationStatus::Accepted,
        )
        .await
        .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::Conflict(_)));

        let reread = entity_api::application::find_by_id(&db, application.id).await?;
        assert_eq!(reread.status, ApplicationStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn only_the_applicant_may_cancel_while_pending() -> Result<(), Error> {
        let db = setup_db().await;
        mentee_and_mentor(&db).await;
        let publisher = EventPublisher::new();
        let application = create(&db, &publisher, "m1", "t1", MESSAGE.to_string()).await?;

        let err = cancel(&db, &publisher, "t1", application.id)
            .await
            .unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::Forbidden(_)));

        cancel(&db, &publisher, "m1", application.id).await?;
        assert!(list_for_user(&db, "m1").await?.is_empty());

        let inbox = crate::notification::list(&db, "t1").await?;
        assert_eq!(
            inbox[0].notification_type,
            NotificationType::ApplicationCancelled
        );

        let err = cancel(&db, &publisher, "m1", application.id)
            .await
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::NotFound("application".to_string())
        );
        Ok(())
    }
}
