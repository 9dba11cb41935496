//! Indexer service: serializes ingestion, projects events, emits changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{
    EntityChange, EntityKind, EventBus, EventEnvelope, EventPosition, MemoryStore, RecordingStore,
};
use crate::error::IndexerError;
use crate::persistence::EventLog;
use crate::projector;

/// Projection counters reported by `GET /stats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionStats {
    /// Events applied since startup, replayed ones included.
    pub events_processed: u64,
    /// Position of the most recently applied event.
    pub last_position: Option<EventPosition>,
    /// Stored entities per kind.
    pub entities: BTreeMap<EntityKind, usize>,
}

#[derive(Debug, Default)]
struct ProjectionState {
    store: MemoryStore,
    events_processed: u64,
    last_position: Option<EventPosition>,
}

impl ProjectionState {
    fn apply(&mut self, envelope: &EventEnvelope) -> Vec<EntityChange> {
        let mut recording = RecordingStore::new(&mut self.store);
        projector::process(&mut recording, &envelope.event);
        let saved = recording.into_saved();

        self.events_processed = self.events_processed.saturating_add(1);
        self.last_position = Some(envelope.position());

        let cause = envelope.event.kind_str();
        let position = envelope.position();
        let timestamp = Utc::now();
        saved
            .into_iter()
            .map(|record| EntityChange {
                cause,
                position,
                record,
                timestamp,
            })
            .collect()
    }
}

/// Single-writer front of the projector.
///
/// Owns the entity store behind one async mutex; every ingest holds it for
/// the full append-project-publish sequence, so events are applied one at a
/// time in arrival order.
#[derive(Debug)]
pub struct IndexerService {
    state: Mutex<ProjectionState>,
    event_bus: EventBus,
    event_log: Option<Arc<dyn EventLog>>,
}

impl IndexerService {
    /// Creates a service over an empty store with no event log.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            state: Mutex::new(ProjectionState::default()),
            event_bus,
            event_log: None,
        }
    }

    /// Appends every future ingested event to `log`, and replays it on
    /// [`restore_from_log`](Self::restore_from_log).
    #[must_use]
    pub fn with_event_log<L: EventLog + 'static>(mut self, log: L) -> Self {
        self.event_log = Some(Arc::new(log));
        self
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Appends (when persistence is on), projects and publishes one event.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::PersistenceError`] if the append fails; the
    /// event is then not projected.
    pub async fn ingest(&self, envelope: EventEnvelope) -> Result<Vec<EntityChange>, IndexerError> {
        let mut state = self.state.lock().await;
        self.ingest_locked(&mut state, &envelope).await
    }

    /// Ingests envelopes in order under a single lock.
    ///
    /// Stops at the first failure; events before it stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::InvalidRequest`] for an empty batch, or the
    /// first persistence error.
    pub async fn ingest_batch(
        &self,
        envelopes: Vec<EventEnvelope>,
    ) -> Result<Vec<Vec<EntityChange>>, IndexerError> {
        if envelopes.is_empty() {
            return Err(IndexerError::InvalidRequest("empty batch".to_string()));
        }
        let mut state = self.state.lock().await;
        let mut results = Vec::with_capacity(envelopes.len());
        for envelope in &envelopes {
            results.push(self.ingest_locked(&mut state, envelope).await?);
        }
        tracing::info!(events = envelopes.len(), "batch ingested");
        Ok(results)
    }

    async fn ingest_locked(
        &self,
        state: &mut ProjectionState,
        envelope: &EventEnvelope,
    ) -> Result<Vec<EntityChange>, IndexerError> {
        if let Some(log) = &self.event_log {
            log.append(envelope).await?;
        }
        let changes = state.apply(envelope);
        for change in &changes {
            let _ = self.event_bus.publish(change.clone());
        }
        tracing::debug!(
            event = envelope.event.kind_str(),
            block = envelope.block_number,
            log_index = envelope.log_index,
            changes = changes.len(),
            "event projected"
        );
        Ok(changes)
    }

    /// Projects already-logged events without re-appending or publishing.
    ///
    /// Returns the number of events applied.
    pub async fn replay<I>(&self, envelopes: I) -> usize
    where
        I: IntoIterator<Item = EventEnvelope>,
    {
        let mut state = self.state.lock().await;
        let mut applied = 0;
        for envelope in envelopes {
            let _ = state.apply(&envelope);
            applied += 1;
        }
        applied
    }

    /// Rebuilds the store from the attached event log, if any, applying
    /// events in append order.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::PersistenceError`] if the log cannot be read
    /// or [`IndexerError::MalformedEvent`] if a stored row no longer
    /// decodes. Nothing is applied in either case.
    pub async fn restore_from_log(&self) -> Result<usize, IndexerError> {
        let Some(log) = &self.event_log else {
            return Ok(0);
        };
        let rows = log.load_all().await?;
        let envelopes = rows
            .iter()
            .map(|row| row.to_envelope())
            .collect::<Result<Vec<_>, _>>()?;
        let applied = self.replay(envelopes).await;
        tracing::info!(events = applied, "event log replayed");
        Ok(applied)
    }

    /// Returns projection counters.
    pub async fn stats(&self) -> ProjectionStats {
        let state = self.state.lock().await;
        let entities = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, state.store.count(kind)))
            .collect();
        ProjectionStats {
            events_processed: state.events_processed,
            last_position: state.last_position,
            entities,
        }
    }

    /// Returns a copy of the current store.
    pub async fn snapshot(&self) -> MemoryStore {
        self.state.lock().await.store.clone()
    }
}
