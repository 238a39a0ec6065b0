//! API Routes
//!
//! Configures the Axum router for the cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, get_handler, health_handler, invalidate_handler, invalidate_tag_handler,
    stats_handler, AppState,
};

/// Creates the admin router.
///
/// # Endpoints
/// - `GET /cache/:key` - Read a cached value
/// - `DELETE /cache/:key` - Invalidate a key and its dependents
/// - `DELETE /tags/:tag` - Invalidate every entry carrying a tag
/// - `POST /clear` - Drop all entries and reset counters
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache/:key", get(get_handler).delete(invalidate_handler))
        .route("/tags/:tag", delete(invalidate_tag_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
