//! HTTP API server for the bookstore catalog.
//!
//! Provides REST endpoints for the book collection and per-user book
//! relations, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch};
use domain::CatalogService;
use metrics_exporter_prometheus::PrometheusHandle;
use store::CatalogStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::books::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CatalogStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/books/",
            get(routes::books::list::<S>).post(routes::books::create::<S>),
        )
        .route(
            "/books/{id}/",
            get(routes::books::retrieve::<S>)
                .put(routes::books::update::<S>)
                .delete(routes::books::destroy::<S>),
        )
        .route(
            "/relations/{book_id}/",
            patch(routes::relations::update::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the shared application state around a catalog store.
pub fn create_state<S: CatalogStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        catalog: CatalogService::new(store),
    })
}
