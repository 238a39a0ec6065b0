//! Cache Module
//!
//! Read-through caching with lazy TTL expiry, count/size eviction, tag and
//! dependency invalidation, and background refresh.

mod dependency;
mod entry;
pub mod keys;
mod lru;
mod manager;
mod options;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use dependency::DependencyGraph;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use manager::CacheManager;
pub use options::CacheOptions;
pub use stats::CacheStats;
pub use store::CacheStore;
