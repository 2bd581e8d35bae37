use crate::error::Error;
use entity::notification_type::NotificationType;
use entity::notifications::Model;
use entity::Id;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

/// Appends a notification and pushes it to the recipient's live session.
///
/// Notifications are a side effect of other operations, so a failure here is
/// logged and swallowed instead of failing the caller.
pub(crate) async fn notify(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    notification_type: NotificationType,
    content: impl Into<String>,
) {
    match entity_api::notification::create(db, user_id, notification_type, content.into()).await {
        Ok(notification) => publish_created(publisher, &notification).await,
        Err(err) => {
            warn!("Failed to record {notification_type} notification for {user_id}: {err}");
        }
    }
}

async fn publish_created(publisher: &EventPublisher, notification: &Model) {
    match serde_json::to_value(notification) {
        Ok(value) => {
            publisher
                .publish(DomainEvent::NotificationCreated {
                    user_id: notification.user_id.clone(),
                    notification: value,
                })
                .await
        }
        Err(err) => warn!("Failed to serialize notification {}: {err}", notification.id),
    }
}

/// Creates a notification of an explicitly named type.
pub async fn create(
    db: &impl ConnectionTrait,
    publisher: &EventPublisher,
    user_id: &str,
    notification_type: &str,
    content: String,
) -> Result<Model, Error> {
    let notification_type: NotificationType = notification_type
        .parse()
        .map_err(|_| Error::invalid(format!("unknown notification type {notification_type}")))?;

    let notification =
        entity_api::notification::create(db, user_id, notification_type, content).await?;
    publish_created(publisher, &notification).await;

    Ok(notification)
}

/// The user's notifications, newest first.
pub async fn list(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(entity_api::notification::find_by_user(db, user_id).await?)
}

/// Marks one of the user's notifications read. Notifications owned by
/// someone else are reported as missing.
pub async fn mark_read(db: &impl ConnectionTrait, user_id: &str, id: Id) -> Result<Model, Error> {
    entity_api::notification::mark_read(db, id, user_id)
        .await
        .map_err(|err| match err.error_kind {
            entity_api::error::EntityApiErrorKind::RecordNotFound => {
                Error::not_found("notification")
            }
            _ => err.into(),
        })
}

pub async fn mark_all_read(db: &impl ConnectionTrait, user_id: &str) -> Result<u64, Error> {
    Ok(entity_api::notification::mark_all_read(db, user_id).await?)
}

/// Deletes notifications older than `retention_days`.
pub async fn purge_older_than(db: &impl ConnectionTrait, retention_days: u32) -> Result<u64, Error> {
    let cutoff = chrono::Utc::now() - chrono::Duration::days(i64::from(retention_days));
    let deleted = entity_api::notification::delete_created_before(db, cutoff.into()).await?;

    if deleted > 0 {
        info!("Purged {deleted} notification(s) older than {retention_days} day(s)");
    }

    Ok(deleted)
}

/// Periodically purges expired notifications. Runs until the task is dropped.
pub async fn run_retention_sweep(
    db: Arc<DatabaseConnection>,
    retention_days: u32,
    interval: Duration,
) {
    info!(
        "Notification retention sweep every {}s, keeping {retention_days} day(s)",
        interval.as_secs()
    );

    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(err) = purge_older_than(db.as_ref(), retention_days).await {
            error!("Notification retention sweep failed: {err}");
        }
    }
}
