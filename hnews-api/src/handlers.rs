//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use hnews_core::types::{Story, StoryType};

use crate::dto::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.fetcher.cache().stats().into(),
    })
}

/// GET /api/stories
pub async fn list_top_stories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Story>>> {
    let stories = state.fetcher.fetch(StoryType::Top).await?;
    Ok(Json(stories))
}

/// GET /api/stories/:type
pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    Path(story_type): Path<String>,
) -> Result<Json<Vec<Story>>> {
    let stories = state.fetcher.fetch_stories(&story_type).await?;
    Ok(Json(stories))
}
