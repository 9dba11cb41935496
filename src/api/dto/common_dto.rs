//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::EntityChange;

/// One entity written while projecting an event.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChangeDto {
    /// Entity kind (`restaurant`, `drop`, `reservation`, `listing`).
    pub kind: String,
    /// Entity id.
    pub id: String,
}

impl From<&EntityChange> for ChangeDto {
    fn from(change: &EntityChange) -> Self {
        Self {
            kind: change.kind().as_str().to_string(),
            id: change.id().to_string(),
        }
    }
}
