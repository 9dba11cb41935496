//! Event ingestion handlers: single event and ordered batch.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{BatchIngestResponse, IngestResponse};
use crate::app_state::AppState;
use crate::domain::EventEnvelope;
use crate::error::{ErrorResponse, IndexerError};

/// `POST /events` — Project one decoded contract event.
///
/// # Errors
///
/// Returns [`IndexerError::MalformedEvent`] if the body does not decode,
/// or [`IndexerError::PersistenceError`] if the event log rejects it.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Ingest one event",
    description = "Decodes an event envelope (`blockNumber`, `logIndex`, tagged `event`), appends it to the event log when persistence is enabled, and projects it into the entity store.",
    request_body = serde_json::Value,
    responses(
        (status = 202, description = "Event projected", body = IngestResponse),
        (status = 400, description = "Malformed event", body = ErrorResponse),
        (status = 500, description = "Event log failure", body = ErrorResponse),
    )
)]
pub async fn ingest_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, IndexerError> {
    let envelope: EventEnvelope = serde_json::from_slice(&body)?;
    let changes = state.indexer.ingest(envelope.clone()).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse::new(&envelope, &changes)),
    ))
}

/// `POST /events/batch` — Project an ordered array of events.
///
/// The whole body is decoded before anything is applied.
///
/// # Errors
///
/// Returns [`IndexerError::MalformedEvent`] if any envelope does not
/// decode, [`IndexerError::InvalidRequest`] for an empty or oversized
/// batch, or the first persistence error.
#[utoipa::path(
    post,
    path = "/api/v1/events/batch",
    tag = "Events",
    summary = "Ingest a batch of events",
    description = "Decodes a JSON array of event envelopes and projects them in array order under a single lock. A malformed envelope rejects the whole batch.",
    request_body = serde_json::Value,
    responses(
        (status = 202, description = "Batch projected", body = BatchIngestResponse),
        (status = 400, description = "Malformed, empty, or oversized batch", body = ErrorResponse),
        (status = 500, description = "Event log failure", body = ErrorResponse),
    )
)]
pub async fn ingest_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, IndexerError> {
    let envelopes: Vec<EventEnvelope> = serde_json::from_slice(&body)?;
    if envelopes.len() > state.max_batch_size {
        return Err(IndexerError::InvalidRequest(format!(
            "batch of {} exceeds limit of {}",
            envelopes.len(),
            state.max_batch_size
        )));
    }

    let per_event = state.indexer.ingest_batch(envelopes.clone()).await?;
    let results: Vec<IngestResponse> = envelopes
        .iter()
        .zip(per_event.iter())
        .map(|(envelope, changes)| IngestResponse::new(envelope, changes))
        .collect();

    Ok((
        StatusCode::ACCEPTED,
        Json(BatchIngestResponse {
            accepted: results.len(),
            results,
        }),
    ))
}

/// Ingestion routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(ingest_event))
        .route("/events/batch", post(ingest_batch))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::api::build_app;
    use crate::app_state::AppState;
    use crate::domain::EventBus;
    use crate::service::IndexerService;

    fn app(max_batch_size: usize) -> (axum::Router, Arc<IndexerService>) {
        let indexer = Arc::new(IndexerService::new(EventBus::new(100)));
        let state = AppState::new(Arc::clone(&indexer), max_batch_size);
        (build_app(state), indexer)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        let Ok(req) = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("valid request");
        };
        req
    }

    const LISTED: &str = r#"{"blockNumber":7,"logIndex":1,
        "event":{"kind":"ReservationListed","tokenId":"0x10","seller":"0x00000000000000000000000000000000000000BB","price":"500"}}"#;

    #[tokio::test]
    async fn single_event_is_accepted() {
        let (app, indexer) = app(10);
        let Ok(resp) = app.oneshot(post("/api/v1/events", LISTED)).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), axum::http::StatusCode::ACCEPTED);
        assert_eq!(indexer.stats().await.events_processed, 1);
    }

    #[tokio::test]
    async fn malformed_event_is_bad_request() {
        let (app, indexer) = app(10);
        let body = r#"{"blockNumber":7,"logIndex":1,"event":{"kind":"ReservationListed"}}"#;
        let Ok(resp) = app.oneshot(post("/api/v1/events", body)).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(indexer.stats().await.events_processed, 0);
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected() {
        let (app, indexer) = app(1);
        let body = format!("[{LISTED},{LISTED}]");
        let Ok(resp) = app.oneshot(post("/api/v1/events/batch", &body)).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(indexer.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn batch_with_one_bad_envelope_applies_nothing() {
        let (app, indexer) = app(10);
        let body = format!(r#"[{LISTED},{{"blockNumber":8}}]"#);
        let Ok(resp) = app.oneshot(post("/api/v1/events/batch", &body)).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(indexer.snapshot().await.is_empty());
    }
}
