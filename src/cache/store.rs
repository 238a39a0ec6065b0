//! Cache Store Module
//!
//! HashMap storage with lazy TTL expiry, LRU tracking, and count/size
//! eviction.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

/// Count pressure evicts `1 / COUNT_EVICTION_DIVISOR` of the store per pass.
const COUNT_EVICTION_DIVISOR: usize = 10;

/// Size pressure evicts until the total drops to this share of `max_size`.
const SIZE_EVICTION_TARGET: f64 = 0.80;

// == Cache Store ==
/// Keyed collection of cache entries bounded by entry count and total size.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    /// Sum of `size` over all entries
    total_size: usize,
    max_entries: usize,
    max_size: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new store.
    ///
    /// # Arguments
    /// * `max_entries` - Entry count that triggers count eviction
    /// * `max_size` - Byte budget that triggers size eviction
    pub fn new(max_entries: usize, max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            total_size: 0,
            max_entries,
            max_size,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and valid.
    ///
    /// Expired entries are removed and counted as misses. A hit marks the
    /// entry accessed.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<Arc<Value>> {
        let valid = match self.entries.get(key) {
            Some(entry) => entry.is_valid(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if !valid {
            debug!(key, "Entry expired on access");
            self.remove(key);
            self.stats.record_miss();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.mark_accessed(now);
        let data = entry.data();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(data)
    }

    // == Peek ==
    /// Returns a valid entry without touching stats or access order.
    pub fn peek(&self, key: &str, now: Instant) -> Option<&CacheEntry> {
        self.entries.get(key).filter(|entry| entry.is_valid(now))
    }

    /// Mutable access to an entry regardless of validity.
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }

    // == Insert ==
    /// Stores an entry, replacing any previous one under the same key.
    ///
    /// Both eviction checks run before insertion. The new entry itself is
    /// always stored, even when limits force everything else out. Returns the
    /// keys evicted to make room.
    pub fn insert(&mut self, key: String, entry: CacheEntry) -> Vec<String> {
        self.remove(&key);
        let mut evicted = self.evict_for_count();
        evicted.extend(self.evict_for_size(entry.size));

        self.total_size += entry.size;
        self.lru.touch(&key);
        self.entries.insert(key, entry);
        evicted
    }

    // == Remove ==
    /// Removes an entry by key, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.total_size -= entry.size;
        self.lru.remove(key);
        Some(entry)
    }

    // == Tag Lookup ==
    /// Keys of every entry carrying `tag`, expired ones included.
    pub fn keys_with_tag(&self, tag: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.tags.contains(tag))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Keys ==
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns their keys.
    pub fn purge_expired(&mut self, now: Instant) -> Vec<String> {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_valid(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired
    }

    // == Clear ==
    /// Drops every entry and resets all counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats = CacheStats::new();
        self.total_size = 0;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len(), self.total_size)
    }

    pub fn record_refresh(&mut self) {
        self.stats.record_refresh();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Count Eviction ==
    /// Evicts the least-recently-accessed tenth (at least one entry) while
    /// the store is at or over `max_entries`.
    fn evict_for_count(&mut self) -> Vec<String> {
        let mut evicted = Vec::new();
        while !self.entries.is_empty() && self.entries.len() >= self.max_entries {
            let batch = self.entries.len().div_ceil(COUNT_EVICTION_DIVISOR);
            for key in self.lru.oldest(batch) {
                self.evict(&key);
                evicted.push(key);
            }
        }
        evicted
    }

    // == Size Eviction ==
    /// Evicts largest entries first when the incoming entry would push the
    /// total past `max_size`, until the total (incoming included) is back
    /// under the target share or the store is empty.
    fn evict_for_size(&mut self, incoming: usize) -> Vec<String> {
        let mut evicted = Vec::new();
        if self.total_size + incoming <= self.max_size {
            return evicted;
        }

        let target = (self.max_size as f64 * SIZE_EVICTION_TARGET) as usize;
        let mut by_size: Vec<(String, usize)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.size))
            .collect();
        by_size.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        for (key, _) in by_size {
            if self.total_size + incoming <= target {
                break;
            }
            self.evict(&key);
            evicted.push(key);
        }
        evicted
    }

    fn evict(&mut self, key: &str) {
        if let Some(entry) = self.remove(key) {
            debug!(key, size = entry.size, "Evicted entry");
            self.stats.record_eviction();
        }
    }
}
