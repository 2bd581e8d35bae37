//! Request bodies accepted by the controllers.

pub(crate) mod application;
pub(crate) mod chat;
pub(crate) mod connection;
