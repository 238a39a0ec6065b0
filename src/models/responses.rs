//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached JSON value
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for `DELETE /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// The key that was invalidated
    pub key: String,
    /// Entries removed, dependents included
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>, removed: usize) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for `DELETE /tags/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct TagInvalidateResponse {
    pub tag: String,
    pub removed: usize,
}

impl TagInvalidateResponse {
    pub fn new(tag: impl Into<String>, removed: usize) -> Self {
        Self {
            tag: tag.into(),
            removed,
        }
    }
}

/// Response body for `POST /clear`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
