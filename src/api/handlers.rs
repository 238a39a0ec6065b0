//! API Handlers
//!
//! HTTP handlers for the cache admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use serde_json::Value;

use crate::cache::{CacheManager, CacheStats};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, GetResponse, HealthResponse, InvalidateResponse, TagInvalidateResponse,
};

/// Application state shared across all handlers.
///
/// Holds the process-wide cache manager, which is itself a cheap clonable
/// handle.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheManager,
}

impl AppState {
    pub fn new(cache: CacheManager) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheManager::from_config(config))
    }
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, Value::clone(&value))))
}

/// Handler for DELETE /cache/:key
///
/// Invalidates the key and everything depending on it. Invalidating an
/// absent key is not an error.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.invalidate(&key).await;
    Json(InvalidateResponse::new(key, removed))
}

/// Handler for DELETE /tags/:tag
pub async fn invalidate_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<TagInvalidateResponse> {
    let removed = state.cache.invalidate_by_tag(&tag).await;
    Json(TagInvalidateResponse::new(tag, removed))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
