//! reserv-indexer server entry point.
//!
//! Starts the Axum HTTP server with ingestion, system and WebSocket
//! endpoints, replaying the event log first when persistence is enabled.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reserv_indexer::api;
use reserv_indexer::app_state::AppState;
use reserv_indexer::config::{IndexerConfig, LogFormat};
use reserv_indexer::domain::EventBus;
use reserv_indexer::persistence::PostgresEventLog;
use reserv_indexer::service::IndexerService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = IndexerConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting reserv-indexer");

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let mut indexer = IndexerService::new(event_bus);

    if config.persistence_enabled {
        let log = PostgresEventLog::connect(&config)
            .await
            .context("connecting to event log database")?;
        log.ensure_schema()
            .await
            .context("creating event log schema")?;
        indexer = indexer.with_event_log(log);

        if config.replay_on_startup {
            let replayed = indexer
                .restore_from_log()
                .await
                .context("replaying event log")?;
            tracing::info!(events = replayed, "store rebuilt from event log");
        }
    } else {
        tracing::warn!("persistence disabled; projection starts empty and is lost on exit");
    }

    let app_state = AppState::new(Arc::new(indexer), config.max_batch_size);
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
