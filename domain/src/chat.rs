//! Chat on a connection.
//!
//! A submitted message is always persisted first. It is then pushed to the
//! recipient's live session if they have one, and a `message_received`
//! notification is recorded either way so nothing depends on the push.

use crate::connection::find_for_participant;
use crate::error::Error;
use crate::notification::notify;
use entity::chat_messages::Model;
use entity::connection_status::ConnectionStatus;
use entity::notification_type::NotificationType;
use entity::Id;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use service::config::MessagingPolicy;

const PREVIEW_CHARS: usize = 120;

/// Persists a message from `sender_id` and routes it to the other participant.
pub async fn submit(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    policy: MessagingPolicy,
    sender_id: &str,
    connection_id: Id,
    body: &str,
) -> Result<Model, Error> {
    if body.trim().is_empty() {
        return Err(Error::invalid("message body must not be empty"));
    }

    let connection = find_for_participant(db, sender_id, connection_id).await?;

    if policy == MessagingPolicy::AcceptedOnly && connection.status != ConnectionStatus::Accepted
    {
        return Err(Error::forbidden(format!(
            "messages require an accepted connection, this one is {}",
            connection.status
        )));
    }

    let txn = db.begin().await?;
    let message = match append(&txn, connection_id, sender_id, body).await {
        Ok(message) => {
            txn.commit().await?;
            message
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(
                    "Failed to roll back message on connection {connection_id}: {rollback_err}"
                );
            }
            return Err(err);
        }
    };

    let Some(recipient_id) = connection.counterpart_of(sender_id).cloned() else {
        return Ok(message);
    };

    debug!(
        "Message {} on connection {connection_id} from {sender_id} to {recipient_id}",
        message.id
    );

    match serde_json::to_value(&message) {
        Ok(value) => {
            publisher
                .publish(DomainEvent::ChatMessageSubmitted {
                    connection_id,
                    message: value,
                    sender_id: sender_id.to_owned(),
                    recipient_id: recipient_id.clone(),
                })
                .await
        }
        Err(err) => warn!("Failed to serialize message {}: {err}", message.id),
    }

    notify(
        db,
        publisher,
        &recipient_id,
        NotificationType::MessageReceived,
        "You have a new message",
    )
    .await;

    Ok(message)
}

async fn append(
    txn: &DatabaseTransaction,
    connection_id: Id,
    sender_id: &str,
    body: &str,
) -> Result<Model, Error> {
    let message =
        entity_api::chat_message::create(txn, connection_id, sender_id, body.to_owned()).await?;
    entity_api::connection::record_last_message(
        txn,
        connection_id,
        message.created_at,
        preview(body),
    )
    .await?;
    Ok(message)
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

/// The connection's message history, oldest first.
pub async fn get_messages(
    db: &DatabaseConnection,
    user_id: &str,
    connection_id: Id,
) -> Result<Vec<Model>, Error> {
    find_for_participant(db, user_id, connection_id).await?;
    Ok(entity_api::chat_message::find_by_connection(db, connection_id).await?)
}

/// Marks every message the other participant sent as read. Returns how many
/// messages changed, so a repeated call returns zero.
pub async fn mark_read(
    db: &DatabaseConnection,
    user_id: &str,
    connection_id: Id,
) -> Result<u64, Error> {
    find_for_participant(db, user_id, connection_id).await?;
    Ok(entity_api::chat_message::mark_read_for_reader(db, connection_id, user_id).await?)
}
