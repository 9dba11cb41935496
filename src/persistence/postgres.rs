//! PostgreSQL implementation of the event log.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::EventLog;
use super::models::StoredEvent;
use crate::config::IndexerConfig;
use crate::domain::EventEnvelope;
use crate::error::IndexerError;

const CREATE_EVENTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS indexed_events (
    id           BIGSERIAL PRIMARY KEY,
    block_number BIGINT      NOT NULL,
    log_index    BIGINT      NOT NULL,
    event_type   TEXT        NOT NULL,
    payload      JSONB       NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const CREATE_POSITION_INDEX: &str = "\
CREATE INDEX IF NOT EXISTS indexed_events_position \
ON indexed_events (block_number, log_index)";

/// PostgreSQL-backed event log using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresEventLog {
    pool: PgPool,
}

impl PostgresEventLog {
    /// Creates an event log over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the pool settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`IndexerError::PersistenceError`] if the database is
    /// unreachable.
    pub async fn connect(config: &IndexerConfig) -> Result<Self, IndexerError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates the `indexed_events` table and its index if missing.
    ///
    /// # Errors
    ///
    /// Returns a [`IndexerError::PersistenceError`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), IndexerError> {
        sqlx::query(CREATE_EVENTS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_POSITION_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventLog for PostgresEventLog {
    async fn append(&self, envelope: &EventEnvelope) -> Result<i64, IndexerError> {
        let row = StoredEvent::from_envelope(0, envelope, Utc::now())?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO indexed_events (block_number, log_index, event_type, payload) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(row.block_number)
        .bind(row.log_index)
        .bind(&row.event_type)
        .bind(&row.payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn load_all(&self) -> Result<Vec<StoredEvent>, IndexerError> {
        let rows = sqlx::query_as::<_, (i64, i64, i64, String, serde_json::Value, DateTime<Utc>)>(
            "SELECT id, block_number, log_index, event_type, payload, created_at \
             FROM indexed_events ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, block_number, log_index, event_type, payload, created_at)| StoredEvent {
                    id,
                    block_number,
                    log_index,
                    event_type,
                    payload,
                    created_at,
                },
            )
            .collect())
    }
}
