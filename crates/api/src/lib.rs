//! HTTP API server for the customer accounts service.
//!
//! Exposes the customer commands and the customer view as REST endpoints,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use event_store::EventStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::customers::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EventStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/customers", post(routes::customers::register::<S>))
        .route(
            "/customers/{id}",
            get(routes::customers::get::<S>).delete(routes::customers::delete::<S>),
        )
        .route(
            "/customers/{id}/email-address",
            put(routes::customers::change_email_address::<S>),
        )
        .route(
            "/customers/{id}/email-address/confirmation",
            post(routes::customers::confirm_email_address::<S>),
        )
        .route("/customers/{id}/name", put(routes::customers::change_name::<S>))
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

/// Creates the default application state over the given event store.
pub fn create_default_state<S: EventStore + Clone + 'static>(event_store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(event_store))
}
