//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Stories
        .route("/api/stories", get(handlers::list_top_stories))
        .route("/api/stories/:type", get(handlers::list_stories))

        .with_state(state)
}
