//! Event system infrastructure for the mentorship platform.
//!
//! This crate decouples domain logic from delivery concerns such as pushing
//! updates over live sessions.
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Opaque user identifier issued by the identity provider.
pub type UserId = String;

/// Domain events that represent business-level changes in the system.
/// These events are emitted after the change has been persisted.
///
/// Events name the users that should hear about them; the domain layer
/// decides who those are.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A chat message was persisted on a connection.
    ChatMessageSubmitted {
        connection_id: Id,
        /// The persisted message.
        message: Value,
        sender_id: UserId,
        recipient_id: UserId,
    },
    /// A notification was appended to a user's inbox.
    NotificationCreated {
        user_id: UserId,
        notification: Value,
    },
    /// A connection was created or changed status or progress.
    ConnectionUpdated {
        connection_id: Id,
        connection: Value,
        notify_user_ids: Vec<UserId>,
    },
    /// An application was filed, resolved or cancelled.
    ApplicationUpdated {
        application_id: Id,
        /// `None` once the application has been cancelled.
        application: Option<Value>,
        notify_user_ids: Vec<UserId>,
    },
}

/// Trait for handling domain events.
/// Implementations perform side effects like pushing to live sessions.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers must not fail loudly: delivery is best-effort.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
        label: &'static str,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            if let DomainEvent::NotificationCreated { user_id, .. } = event {
                if let Ok(mut seen) = self.seen.lock() {
                    seen.push(format!("{}:{user_id}", self.label));
                }
            }
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_handler_in_registration_order() {
        let first = Arc::new(Recorder {
            label: "first",
            ..Default::default()
        });
        let second = Arc::new(Recorder {
            label: "second",
            ..Default::default()
        });
        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        publisher
            .publish(DomainEvent::NotificationCreated {
                user_id: "mentee-1".to_string(),
                notification: Value::Null,
            })
            .await;

        assert_eq!(*first.seen.lock().unwrap(), vec!["first:mentee-1"]);
        assert_eq!(*second.seen.lock().unwrap(), vec!["second:mentee-1"]);
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        EventPublisher::default()
            .publish(DomainEvent::ConnectionUpdated {
                connection_id: Id::new_v4(),
                connection: Value::Null,
                notify_user_ids: vec![],
            })
            .await;
    }
}
