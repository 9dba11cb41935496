//! Ingestion and statistics DTOs.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::ChangeDto;
use crate::domain::{EntityChange, EventEnvelope};
use crate::service::ProjectionStats;

/// Response body for `POST /events` (202 Accepted).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Contract event name.
    pub event: String,
    /// Block the event was emitted in.
    pub block_number: u64,
    /// Log index within the block.
    pub log_index: u64,
    /// Entities saved while projecting it, in save order.
    pub changes: Vec<ChangeDto>,
}

impl IngestResponse {
    /// Builds the receipt for one projected envelope.
    #[must_use]
    pub fn new(envelope: &EventEnvelope, changes: &[EntityChange]) -> Self {
        Self {
            event: envelope.event.kind_str().to_string(),
            block_number: envelope.block_number,
            log_index: envelope.log_index,
            changes: changes.iter().map(ChangeDto::from).collect(),
        }
    }
}

/// Response body for `POST /events/batch` (202 Accepted).
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchIngestResponse {
    /// Number of events applied.
    pub accepted: usize,
    /// Per-event receipts, in input order.
    pub results: Vec<IngestResponse>,
}

/// Response body for `GET /stats`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Events applied since startup.
    pub events_processed: u64,
    /// Block of the last applied event.
    pub last_block_number: Option<u64>,
    /// Log index of the last applied event.
    pub last_log_index: Option<u64>,
    /// Stored entities per kind.
    pub entities: BTreeMap<String, usize>,
}

impl From<ProjectionStats> for StatsResponse {
    fn from(stats: ProjectionStats) -> Self {
        Self {
            events_processed: stats.events_processed,
            last_block_number: stats.last_position.map(|p| p.block_number),
            last_log_index: stats.last_position.map(|p| p.log_index),
            entities: stats
                .entities
                .into_iter()
                .map(|(kind, count)| (kind.as_str().to_string(), count))
                .collect(),
        }
    }
}
