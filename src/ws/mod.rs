//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams entity changes to clients that
//! subscribe by entity kind.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
