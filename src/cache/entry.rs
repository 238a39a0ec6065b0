//! Cache Entry Module
//!
//! Defines a single cached value with its age, access statistics, tags,
//! serialized size, and content fingerprint.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::error::Result;

// == FNV-1a constants ==
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// == Cache Entry ==
/// One cached value plus the metadata the store needs for expiry,
/// eviction, and change detection.
///
/// The value sits behind an `Arc` so readers share it without being able to
/// mutate what the cache holds.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    data: Arc<Value>,
    /// Insertion (or last re-validation) time
    pub created_at: Instant,
    /// Lifetime measured from `created_at`; always non-zero
    pub ttl: Duration,
    /// Time of the most recent successful read
    pub last_accessed_at: Instant,
    /// Number of successful reads
    pub access_count: u64,
    /// Labels used for group invalidation
    pub tags: HashSet<String>,
    /// Byte length of the compact JSON serialization
    pub size: usize,
    /// FNV-1a hash of the serialized value
    pub fingerprint: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry from an already-converted JSON value.
    ///
    /// Serializes the value once to compute `size` and `fingerprint`; a value
    /// that fails to serialize never becomes an entry.
    pub fn new(data: Value, ttl: Duration, tags: HashSet<String>, now: Instant) -> Result<Self> {
        let bytes = serde_json::to_vec(&data)?;

        Ok(Self {
            data: Arc::new(data),
            created_at: now,
            ttl,
            last_accessed_at: now,
            access_count: 0,
            tags,
            size: bytes.len(),
            fingerprint: Self::compute_fingerprint(&bytes),
        })
    }

    // == Data ==
    /// Returns a shared handle to the cached value.
    pub fn data(&self) -> Arc<Value> {
        Arc::clone(&self.data)
    }

    // == Validity ==
    /// Checks whether the entry is still within its TTL.
    ///
    /// An entry expires once `now - created_at >= ttl`.
    pub fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }

    /// Returns the time left before expiry, zero once expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.created_at))
    }

    // == Access Tracking ==
    /// Records a successful read.
    pub fn mark_accessed(&mut self, now: Instant) {
        self.last_accessed_at = now;
        self.access_count += 1;
    }

    /// Restarts the TTL clock without touching the value.
    pub fn revalidate(&mut self, now: Instant) {
        self.created_at = now;
    }

    // == Fingerprinting ==
    /// FNV-1a over the serialized bytes.
    ///
    /// Only a cheap "probably changed" signal: a collision costs a skipped
    /// replacement, never wrong data, since the old value was equally valid.
    pub fn compute_fingerprint(bytes: &[u8]) -> u64 {
        bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
    }

    /// Compares a freshly loaded candidate against the stored fingerprint.
    pub fn has_changed(&self, candidate: &Value) -> Result<bool> {
        let bytes = serde_json::to_vec(candidate)?;
        Ok(Self::compute_fingerprint(&bytes) != self.fingerprint)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(data: Value, ttl_secs: u64) -> CacheEntry {
        CacheEntry::new(data, Duration::from_secs(ttl_secs), HashSet::new(), Instant::now()).unwrap()
    }

    #[test]
    fn test_entry_creation() {
        let entry = entry(json!({"name": "Ada"}), 60);

        assert_eq!(*entry.data(), json!({"name": "Ada"}));
        assert_eq!(entry.size, r#"{"name":"Ada"}"#.len());
        assert_eq!(entry.access_count, 0);
        assert!(entry.is_valid(entry.created_at));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = entry(json!(1), 10);
        let at_ttl = entry.created_at + Duration::from_secs(10);

        assert!(entry.is_valid(at_ttl - Duration::from_millis(1)));
        assert!(!entry.is_valid(at_ttl), "Entry should be expired at boundary");
        assert_eq!(entry.remaining(at_ttl), Duration::ZERO);
    }

    #[test]
    fn test_remaining_counts_down() {
        let entry = entry(json!(1), 10);
        let later = entry.created_at + Duration::from_secs(4);

        assert_eq!(entry.remaining(later), Duration::from_secs(6));
    }

    #[test]
    fn test_mark_accessed() {
        let mut entry = entry(json!("x"), 10);
        let later = entry.created_at + Duration::from_secs(2);

        entry.mark_accessed(later);
        entry.mark_accessed(later);

        assert_eq!(entry.access_count, 2);
        assert_eq!(entry.last_accessed_at, later);
    }

    #[test]
    fn test_revalidate_restarts_ttl() {
        let mut entry = entry(json!("x"), 10);
        let later = entry.created_at + Duration::from_secs(9);

        entry.revalidate(later);

        assert!(entry.is_valid(later + Duration::from_secs(5)));
    }

    #[test]
    fn test_fingerprint_known_vectors() {
        assert_eq!(CacheEntry::compute_fingerprint(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(CacheEntry::compute_fingerprint(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        assert_ne!(
            CacheEntry::compute_fingerprint(b"[1,2]"),
            CacheEntry::compute_fingerprint(b"[2,1]")
        );
    }

    #[test]
    fn test_has_changed() {
        let entry = entry(json!({"students": [1, 2, 3]}), 60);

        assert!(!entry.has_changed(&json!({"students": [1, 2, 3]})).unwrap());
        assert!(entry.has_changed(&json!({"students": [1, 2]})).unwrap());
    }
}
