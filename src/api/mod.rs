//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Ingestion endpoints are mounted under `/api/v1`; system endpoints and
//! the WebSocket feed sit at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the served application: REST, WebSocket, API docs and the
/// HTTP middleware stack.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler))
        .merge(docs_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
        use utoipa::OpenApi;
        axum::Json(openapi::ApiDoc::openapi())
    }

    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::EventBus;
    use crate::service::IndexerService;

    fn app() -> Router {
        let indexer = Arc::new(IndexerService::new(EventBus::new(16)));
        build_app(AppState::new(indexer, 100))
    }

    fn get_req(uri: &str) -> Request<Body> {
        let Ok(req) = Request::get(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        req
    }

    #[tokio::test]
    async fn health_is_ok() {
        let Ok(resp) = app().oneshot(get_req("/health")).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn stats_is_ok() {
        let Ok(resp) = app().oneshot(get_req("/stats")).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let Ok(resp) = app().oneshot(get_req("/api-docs/openapi.json")).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let Ok(resp) = app().oneshot(get_req("/api/v1/restaurants")).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
