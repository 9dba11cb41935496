//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::IndexerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Indexer service for ingestion and statistics.
    pub indexer: Arc<IndexerService>,
    /// Change bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Largest accepted batch, in events.
    pub max_batch_size: usize,
}

impl AppState {
    /// Builds state around `indexer`, sharing its change bus.
    #[must_use]
    pub fn new(indexer: Arc<IndexerService>, max_batch_size: usize) -> Self {
        let event_bus = indexer.event_bus().clone();
        Self {
            indexer,
            event_bus,
            max_batch_size,
        }
    }
}
