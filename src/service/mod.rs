//! Service layer: ingestion orchestration.
//!
//! [`IndexerService`] serializes event ingestion, appends to the event log,
//! runs the projector, and emits changes through the
//! [`super::domain::EventBus`].

pub mod indexer_service;

pub use indexer_service::{IndexerService, ProjectionStats};
