use crate::message::Event;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Routes domain events to the live sessions of the users they name.
///
/// Offline users are skipped silently; every event routed here is already
/// durable, so a missed push loses nothing.
pub struct LiveEventHandler {
    manager: Arc<Manager>,
}

impl LiveEventHandler {
    pub fn new(manager: Arc<Manager>) -> Self {
        Self { manager }
    }

    fn send_to_users(&self, event: Event, user_ids: &[events::UserId]) {
        let delivered = user_ids
            .iter()
            .filter(|user_id| self.manager.send_to_user(user_id, event.clone()))
            .count();

        debug!(
            "Pushed live event to {delivered} of {} user(s)",
            user_ids.len()
        );
    }
}

#[async_trait]
impl EventHandler for LiveEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::ChatMessageSubmitted {
                connection_id,
                message,
                sender_id,
                recipient_id,
            } => {
                let connection_id = connection_id.to_string();

                self.manager.send_to_user(
                    recipient_id,
                    Event::MessageReceived {
                        connection_id: connection_id.clone(),
                        message: message.clone(),
                    },
                );
                self.manager.send_to_user(
                    sender_id,
                    Event::MessageSent {
                        connection_id,
                        message: message.clone(),
                    },
                );
            }

            DomainEvent::NotificationCreated {
                user_id,
                notification,
            } => {
                self.manager.send_to_user(
                    user_id,
                    Event::NotificationCreated {
                        notification: notification.clone(),
                    },
                );
            }

            DomainEvent::ConnectionUpdated {
                connection_id,
                connection,
                notify_user_ids,
            } => {
                debug!("Handling ConnectionUpdated event for connection {connection_id}");

                self.send_to_users(
                    Event::ConnectionUpdated {
                        connection_id: connection_id.to_string(),
                        connection: connection.clone(),
                    },
                    notify_user_ids,
                );
            }

            DomainEvent::ApplicationUpdated {
                application_id,
                application,
                notify_user_ids,
            } => {
                debug!("Handling ApplicationUpdated event for application {application_id}");

                self.send_to_users(
                    Event::ApplicationUpdated {
                        application_id: application_id.to_string(),
                        application: application.clone(),
                    },
                    notify_user_ids,
                );
            }
        }
    }
}
