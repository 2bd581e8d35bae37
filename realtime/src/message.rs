use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Trait for getting the live event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Events pushed to a live session, serialized as
/// `{"type": "...", "data": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    // Chat (connection-scoped)
    #[serde(rename = "message_received")]
    MessageReceived {
        connection_id: String,
        message: Value,
    },
    /// Acknowledges the sender's own submission once persisted.
    #[serde(rename = "message_sent")]
    MessageSent {
        connection_id: String,
        message: Value,
    },

    // Inbox and lifecycle
    #[serde(rename = "notification_created")]
    NotificationCreated { notification: Value },
    #[serde(rename = "connection_updated")]
    ConnectionUpdated {
        connection_id: String,
        connection: Value,
    },
    #[serde(rename = "application_updated")]
    ApplicationUpdated {
        application_id: String,
        application: Option<Value>,
    },

    // Session events
    #[serde(rename = "session_replaced")]
    SessionReplaced { reason: String },
    #[serde(rename = "error")]
    Error { message: String },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::MessageReceived { .. } => "message_received",
            Event::MessageSent { .. } => "message_sent",
            Event::NotificationCreated { .. } => "notification_created",
            Event::ConnectionUpdated { .. } => "connection_updated",
            Event::ApplicationUpdated { .. } => "application_updated",
            Event::SessionReplaced { .. } => "session_replaced",
            Event::Error { .. } => "error",
        }
    }
}

/// A chat message submitted over a live session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    pub connection_id: Uuid,
    pub body: String,
}
