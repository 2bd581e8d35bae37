//! Business rules of the mentorship platform.
//!
//! Every operation takes its storage handle and event publisher explicitly;
//! nothing in this crate holds global state. Entities are re-exported from
//! `entity_api` so callers do not need to depend on it directly.

pub use entity_api::{
    application_status, applications, chat_messages, connection_status, connections, goals,
    matching_preferences, notification_type, notifications, profiles, roles, session_status,
    sessions, string_list, users, Id, UserId,
};

pub mod application;
pub mod chat;
pub mod connection;
pub mod error;
pub mod identity;
pub mod matching;
pub mod notification;
pub mod role;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
