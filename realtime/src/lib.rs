//! Live session infrastructure for real-time chat and updates.
//!
//! # Architecture
//!
//! - **Single live session per user**: opening a new session replaces the
//!   previous one, which is told so with a `session_replaced` event and then
//!   dropped.
//! - **Lock-sharded presence map**: the registry is a `DashMap` keyed by user
//!   id, so registration, removal and lookups lock one shard, never the whole
//!   map.
//! - **Owner-only removal**: a session removes its entry only while the entry
//!   still carries its own session id, so a closing session can never evict
//!   the session that replaced it.
//! - **Fire-and-forget delivery**: pushes are at-most-once. A push to a
//!   missing or closing session is logged and dropped; durable state
//!   (persisted messages and notifications) lives elsewhere.
//!
//! # Message Flow
//!
//! 1. A client opens the `/live` WebSocket with a bearer credential.
//! 2. The web layer verifies it and registers an outbound channel under the
//!    caller's user id.
//! 3. Domain operations publish `DomainEvent`s once their writes commit.
//! 4. `LiveEventHandler` turns each event into a typed live `Event` and hands
//!    it to the `Manager`, which looks up the recipient's session.
//! 5. The session's send task serializes the event as a JSON text frame.
//!
//! # Modules
//!
//! - `presence`: the registry of open sessions
//! - `manager`: session lifecycle and per-user delivery
//! - `message`: outbound event and inbound frame types
//! - `live_event_handler`: domain event to live event routing

pub mod live_event_handler;
pub mod manager;
pub mod message;
pub mod presence;

pub use live_event_handler::LiveEventHandler;
pub use manager::Manager;
