//! Sheet Cache - read-through cache for a spreadsheet-backed admin backend
//!
//! Hides the latency and rate limits of the spreadsheet store behind a
//! bounded in-memory cache with TTL expiry, tag and dependency
//! invalidation, and background refresh.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use cache::{keys, CacheManager, CacheOptions, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
