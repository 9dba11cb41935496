//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use super::dto::{BatchIngestResponse, ChangeDto, IngestResponse, StatsResponse};
use super::handlers::{events, system};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI 3 description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "reserv-indexer",
        description = "Projects restaurant reservation contract events into queryable entities."
    ),
    paths(
        events::ingest_event,
        events::ingest_batch,
        system::health_handler,
        system::stats_handler,
    ),
    components(schemas(
        IngestResponse,
        BatchIngestResponse,
        ChangeDto,
        StatsResponse,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Events", description = "Contract event ingestion"),
        (name = "System", description = "Health and projection statistics"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for path in ["/api/v1/events", "/api/v1/events/batch", "/health", "/stats"] {
            assert!(paths.contains(&path), "missing {path}");
        }
    }
}
