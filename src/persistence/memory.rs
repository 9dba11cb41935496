//! In-process event log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::EventLog;
use super::models::StoredEvent;
use crate::domain::EventEnvelope;
use crate::error::IndexerError;

/// Event log held in memory. Clones share the same rows, so a restarted
/// service can replay what an earlier one appended.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    rows: Arc<Mutex<Vec<StoredEvent>>>,
}

impl MemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of appended events.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Returns `true` if nothing was appended.
    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn append(&self, envelope: &EventEnvelope) -> Result<i64, IndexerError> {
        let mut rows = self.rows.lock().await;
        let id = i64::try_from(rows.len())
            .map_err(|e| IndexerError::Internal(e.to_string()))?
            .saturating_add(1);
        rows.push(StoredEvent::from_envelope(id, envelope, Utc::now())?);
        Ok(id)
    }

    async fn load_all(&self) -> Result<Vec<StoredEvent>, IndexerError> {
        Ok(self.rows.lock().await.clone())
    }
}
