//! Route definitions.

pub mod auth;

use axum::{Json, Router, routing::get};
use serde_json::json;

use crate::state::AppState;

/// Builds the full route tree.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
