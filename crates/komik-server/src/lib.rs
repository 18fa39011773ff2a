//! HTTP API server for the Komik backend.
//!
//! Wires the auth crate's service, extractor, and policy table into an
//! axum application. Construction is explicit: `main` builds the
//! configuration, storage backends, and services by hand and passes
//! them down; nothing is resolved from a container.

pub mod config;
pub mod observability;
pub mod policy;
pub mod response;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Builds the application router with all routes and middleware.
#[must_use]
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
