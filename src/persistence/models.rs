//! Database models for the event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EventEnvelope;
use crate::error::IndexerError;

/// A stored event row from the `indexed_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Block the event was emitted in.
    pub block_number: i64,
    /// Log index within the block.
    pub log_index: i64,
    /// Contract event name (e.g. `"ReservationListed"`).
    pub event_type: String,
    /// JSONB payload holding the tagged [`crate::domain::ChainEvent`].
    pub payload: serde_json::Value,
    /// Server-side append timestamp.
    pub created_at: DateTime<Utc>,
}

impl StoredEvent {
    /// Builds the row an append of `envelope` writes.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::InvalidRequest`] if a position does not fit
    /// a `BIGINT`, or [`IndexerError::Internal`] if the event does not
    /// serialize.
    pub fn from_envelope(
        id: i64,
        envelope: &EventEnvelope,
        created_at: DateTime<Utc>,
    ) -> Result<Self, IndexerError> {
        let payload = serde_json::to_value(&envelope.event)
            .map_err(|e| IndexerError::Internal(e.to_string()))?;
        Ok(Self {
            id,
            block_number: to_db_int(envelope.block_number)?,
            log_index: to_db_int(envelope.log_index)?,
            event_type: envelope.event.kind_str().to_string(),
            payload,
            created_at,
        })
    }

    /// Decodes the row back into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::MalformedEvent`] if the payload no longer
    /// decodes or a position is negative.
    pub fn to_envelope(&self) -> Result<EventEnvelope, IndexerError> {
        let event = serde_json::from_value(self.payload.clone())?;
        let block_number = u64::try_from(self.block_number).map_err(|_| {
            IndexerError::MalformedEvent(format!("negative block number in row {}", self.id))
        })?;
        let log_index = u64::try_from(self.log_index).map_err(|_| {
            IndexerError::MalformedEvent(format!("negative log index in row {}", self.id))
        })?;
        Ok(EventEnvelope {
            block_number,
            log_index,
            event,
        })
    }
}

fn to_db_int(value: u64) -> Result<i64, IndexerError> {
    i64::try_from(value)
        .map_err(|_| IndexerError::InvalidRequest(format!("position {value} exceeds BIGINT")))
}
