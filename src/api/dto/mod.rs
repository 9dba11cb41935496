//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies are decoded straight into [`crate::domain::EventEnvelope`];
//! the types here shape the responses.

pub mod common_dto;
pub mod event_dto;

pub use common_dto::*;
pub use event_dto::*;
