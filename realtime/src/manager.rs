use crate::message::{Event, EventType};
use crate::presence::{PresenceRegistry, SessionId, UserId};
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct Manager {
    registry: Arc<PresenceRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(PresenceRegistry::new()),
        }
    }

    /// Register a live session for `user_id` and return its id
    pub fn open_session(&self, user_id: UserId, sender: UnboundedSender<Event>) -> SessionId {
        let session_id = self.registry.register(user_id.clone(), sender);
        info!("Opened live session {} for {user_id}", session_id.as_str());
        session_id
    }

    /// Close a live session. Has no effect once the session was replaced.
    pub fn close_session(&self, user_id: &str, session_id: &SessionId) {
        if self.registry.unregister(user_id, session_id) {
            info!("Closed live session {} for {user_id}", session_id.as_str());
        } else {
            debug!(
                "Live session {} for {user_id} was already replaced",
                session_id.as_str()
            );
        }
    }

    /// Push an event to a user's live session, if they have one
    pub fn send_to_user(&self, user_id: &str, event: Event) -> bool {
        let event_type = event.event_type();
        let delivered = self.registry.send_to_user(user_id, event);
        trace!("Live event {event_type} for {user_id}: delivered={delivered}");
        delivered
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.registry.is_online(user_id)
    }

    pub fn online_count(&self) -> usize {
        self.registry.online_count()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
