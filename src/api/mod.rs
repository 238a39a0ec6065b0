//! API Module
//!
//! Admin HTTP surface over the process-wide cache manager.
//!
//! # Endpoints
//! - `GET /cache/:key` - Read a cached value
//! - `DELETE /cache/:key` - Invalidate a key and its dependents
//! - `DELETE /tags/:tag` - Invalidate by tag
//! - `POST /clear` - Clear the cache
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
