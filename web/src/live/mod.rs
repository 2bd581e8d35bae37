//! WebSocket endpoint for live sessions.
//!
//! The session infrastructure (presence registry, manager, event types) lives
//! in the `realtime` crate; this module only bridges it onto a socket.

pub(crate) mod handler;
