//! The connection lifecycle: request, accept or reject, complete.
//!
//! ```text
//! pending --accept--> accepted --complete--> completed
//!    \
//!     `--reject--> rejected
//! ```
//!
//! Only the two participants may act on a connection. Every change notifies
//! the other party and is published for live delivery.

use crate::error::Error;
use crate::notification::notify;
use crate::role::{ensure_compatible, RequestType};
use entity::connection_status::ConnectionStatus;
use entity::connections::Model;
use entity::goals::{Goal, Goals};
use entity::notification_type::NotificationType;
use entity::{users, Id};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use utoipa::ToSchema;

/// Requests a connection from `from_user_id` to `to_user_id`.
///
/// For a `mentor_request` the target becomes the mentor; for a
/// `mentee_request` the requester does.
pub async fn create(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    from_user_id: &str,
    to_user_id: &str,
    request_type: RequestType,
) -> Result<Model, Error> {
    if from_user_id == to_user_id {
        return Err(Error::invalid("cannot connect with yourself"));
    }

    let requester = find_active_user(db, from_user_id).await?;
    let target = find_active_user(db, to_user_id).await?;
    ensure_compatible(requester.role, target.role, request_type)?;

    if entity_api::connection::find_by_pair(db, from_user_id, to_user_id)
        .await?
        .is_some()
    {
        return Err(Error::conflict("Connection already exists"));
    }

    let (mentor_id, mentee_id) = match request_type {
        RequestType::MentorRequest => (to_user_id, from_user_id),
        RequestType::MenteeRequest => (from_user_id, to_user_id),
    };

    // A concurrent request for the same pair loses on the unique index.
    let connection = entity_api::connection::create(db, mentor_id, mentee_id)
        .await
        .map_err(|err| match err.error_kind {
            entity_api::error::EntityApiErrorKind::RecordConflict => {
                Error::conflict("Connection already exists")
            }
            _ => err.into(),
        })?;

    info!(
        "Connection {} requested by {from_user_id} ({request_type})",
        connection.id
    );

    let content = match request_type {
        RequestType::MentorRequest => format!("New mentor request from {}", requester.email),
        RequestType::MenteeRequest => format!("New mentee request from {}", requester.email),
    };
    notify(
        db,
        publisher,
        to_user_id,
        NotificationType::ConnectionRequest,
        content,
    )
    .await;
    publish_updated(publisher, &connection).await;

    Ok(connection)
}

pub(crate) async fn find_active_user(
    db: &impl ConnectionTrait,
    user_id: &str,
) -> Result<users::Model, Error> {
    let user = entity_api::user::find_by_id(db, user_id)
        .await
        .map_err(|err| match err.error_kind {
            entity_api::error::EntityApiErrorKind::RecordNotFound => Error::not_found("user"),
            _ => err.into(),
        })?;

    if !user.is_active {
        return Err(Error::invalid(format!("user {user_id} is not active")));
    }

    Ok(user)
}

/// Loads a connection and checks that `user_id` takes part in it.
pub(crate) async fn find_for_participant(
    db: &impl ConnectionTrait,
    user_id: &str,
    connection_id: Id,
) -> Result<Model, Error> {
    let connection = entity_api::connection::find_by_id(db, connection_id)
        .await
        .map_err(|err| match err.error_kind {
            entity_api::error::EntityApiErrorKind::RecordNotFound => {
                Error::not_found("connection")
            }
            _ => err.into(),
        })?;

    if !connection.is_participant(user_id) {
        return Err(Error::forbidden("not a participant of this connection"));
    }

    Ok(connection)
}

/// Moves a connection to `status` on behalf of one of its participants.
pub async fn update_status(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    connection_id: Id,
    status: ConnectionStatus,
) -> Result<Model, Error> {
    let connection = find_for_participant(db, user_id, connection_id).await?;

    if !connection.status.can_transition_to(status) {
        return Err(Error::invalid(format!(
            "cannot move a {} connection to {status}",
            connection.status
        )));
    }

    let updated =
        entity_api::connection::transition_status(db, connection_id, connection.status, status)
            .await?;

    info!("Connection {connection_id} is now {status}");

    let notification_type = match status {
        ConnectionStatus::Accepted => NotificationType::ConnectionAccepted,
        ConnectionStatus::Rejected => NotificationType::ConnectionRejected,
        _ => NotificationType::ConnectionCompleted,
    };
    if let Some(other) = updated.counterpart_of(user_id) {
        notify(
            db,
            publisher,
            other,
            notification_type,
            format!("Connection request {status}"),
        )
        .await;
    }
    publish_updated(publisher, &updated).await;

    Ok(updated)
}

/// New goals and notes for an accepted connection. Both replace what is stored.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub goals: Vec<Goal>,
    pub progress_notes: Option<String>,
}

pub async fn update_progress(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    connection_id: Id,
    update: ProgressUpdate,
) -> Result<Model, Error> {
    let connection = find_for_participant(db, user_id, connection_id).await?;

    if connection.status != ConnectionStatus::Accepted {
        return Err(Error::invalid(
            "progress can only be tracked on an accepted connection",
        ));
    }
    if update.goals.iter().any(|goal| goal.title.trim().is_empty()) {
        return Err(Error::invalid("every goal needs a title"));
    }

    let updated = entity_api::connection::update_progress(
        db,
        connection_id,
        Goals(update.goals),
        update.progress_notes,
    )
    .await?;

    if let Some(other) = updated.counterpart_of(user_id) {
        notify(
            db,
            publisher,
            other,
            NotificationType::ProgressUpdate,
            "Connection progress has been updated",
        )
        .await;
    }
    publish_updated(publisher, &updated).await;

    Ok(updated)
}

/// Every connection the user takes part in, newest first.
pub async fn list_for_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(entity_api::connection::find_by_user(db, user_id).await?)
}

pub(crate) async fn publish_updated(publisher: &EventPublisher, connection: &Model) {
    match serde_json::to_value(connection) {
        Ok(value) => {
            publisher
                .publish(DomainEvent::ConnectionUpdated {
                    connection_id: connection.id,
                    connection: value,
                    notify_user_ids: vec![
                        connection.mentor_id.clone(),
                        connection.mentee_id.clone(),
                    ],
                })
                .await
        }
        Err(err) => warn!("Failed to serialize connection {}: {err}", connection.id),
    }
}
