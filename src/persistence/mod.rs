//! Persistence layer: append-only event log.
//!
//! Every ingested event can be appended to an [`EventLog`]. On startup the
//! log is replayed from genesis into a fresh store, in the order events
//! were appended, which is how the projection recovers after a restart.
//! The production implementation uses `sqlx::PgPool` for async
//! PostgreSQL access.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::EventEnvelope;
use crate::error::IndexerError;

pub use memory::MemoryEventLog;
pub use models::StoredEvent;
pub use postgres::PostgresEventLog;

/// Durable, append-only record of ingested events.
#[async_trait]
pub trait EventLog: Send + Sync + fmt::Debug {
    /// Appends an event, returning its row id. Ids increase with every
    /// append.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::PersistenceError`] on storage failure.
    async fn append(&self, envelope: &EventEnvelope) -> Result<i64, IndexerError>;

    /// Loads the whole log in append order, which is the order events were
    /// projected live. Not re-sorted by chain position.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::PersistenceError`] on storage failure.
    async fn load_all(&self) -> Result<Vec<StoredEvent>, IndexerError>;
}
