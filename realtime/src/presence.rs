use crate::message::Event;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::*;
use tokio::sync::mpsc::UnboundedSender;

pub type UserId = String;

/// Unique identifier for one live session (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct LiveSession {
    pub session_id: SessionId,
    pub sender: UnboundedSender<Event>,
}

/// Online users and the outbound channel of their single live session.
pub struct PresenceRegistry {
    sessions: DashMap<UserId, LiveSession>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Registers a session for `user_id`, replacing any previous one.
    ///
    /// The replaced session is sent `SessionReplaced` before its sender is
    /// dropped, which ends its outbound stream.
    pub fn register(&self, user_id: UserId, sender: UnboundedSender<Event>) -> SessionId {
        let session_id = SessionId::new();
        let session = LiveSession {
            session_id: session_id.clone(),
            sender,
        };

        let replaced = match self.sessions.entry(user_id.clone()) {
            Entry::Occupied(mut occupied) => Some(occupied.insert(session)),
            Entry::Vacant(vacant) => {
                vacant.insert(session);
                None
            }
        };

        if let Some(previous) = replaced {
            debug!(
                "Session {} for user {user_id} replaced by {}",
                previous.session_id.as_str(),
                session_id.as_str()
            );
            // Ignored: the old session may already be gone.
            let _ = previous.sender.send(Event::SessionReplaced {
                reason: "a newer session was opened for this user".to_string(),
            });
        }

        session_id
    }

    /// Removes the user's entry only if it still belongs to `session_id`.
    /// Returns whether an entry was removed.
    pub fn unregister(&self, user_id: &str, session_id: &SessionId) -> bool {
        self.sessions
            .remove_if(user_id, |_, session| session.session_id == *session_id)
            .is_some()
    }

    /// Pushes `event` to the user's live session. Returns `false` when the
    /// user is offline or the session is already closing.
    pub fn send_to_user(&self, user_id: &str, event: Event) -> bool {
        // Clone the sender so no shard lock is held while sending.
        let Some(sender) = self.sessions.get(user_id).map(|s| s.sender.clone()) else {
            return false;
        };

        match sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping live event for user {user_id}: session is closing ({e})");
                false
            }
        }
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.sessions.contains_key(user_id)
    }

    pub fn online_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn ping() -> Event {
        Event::Error {
            message: "ping".to_string(),
        }
    }

    #[test]
    fn send_to_offline_user_returns_false() {
        let registry = PresenceRegistry::new();

        assert!(!registry.send_to_user("nobody", ping()));
    }

    #[tokio::test]
    async fn registered_user_receives_events() {
        let registry = PresenceRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        registry.register("ada".to_string(), tx);

        assert!(registry.is_online("ada"));
        assert!(registry.send_to_user("ada", ping()));
        assert!(matches!(rx.recv().await, Some(Event::Error { .. })));
    }

    #[tokio::test]
    async fn second_registration_replaces_and_notifies_the_first() {
        let registry = PresenceRegistry::new();
        let (old_tx, mut old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        registry.register("ada".to_string(), old_tx);
        registry.register("ada".to_string(), new_tx);

        assert!(matches!(
            old_rx.recv().await,
            Some(Event::SessionReplaced { .. })
        ));
        // The old sender was dropped with the replaced entry.
        assert!(old_rx.recv().await.is_none());

        assert!(registry.send_to_user("ada", ping()));
        assert!(matches!(new_rx.recv().await, Some(Event::Error { .. })));
        assert_eq!(registry.online_count(), 1);
    }

    #[test]
    fn stale_session_cannot_unregister_its_replacement() {
        let registry = PresenceRegistry::new();
        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        let (new_tx, _new_rx) = mpsc::unbounded_channel();

        let old_session = registry.register("ada".to_string(), old_tx);
        let new_session = registry.register("ada".to_string(), new_tx);

        assert!(!registry.unregister("ada", &old_session));
        assert!(registry.is_online("ada"));

        assert!(registry.unregister("ada", &new_session));
        assert!(!registry.is_online("ada"));
    }

    #[test]
    fn send_to_closed_session_is_swallowed() {
        let registry = PresenceRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register("ada".to_string(), tx);
        drop(rx);

        assert!(!registry.send_to_user("ada", ping()));
    }
}
