//! Cache Statistics Module
//!
//! Tracks hit/miss counters and reports occupancy for introspection.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance and occupancy.
///
/// Counters accumulate inside the store; `entries`, `total_size`,
/// `avg_entry_size` and `hit_rate` are filled in when a snapshot is taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,
    /// `hits / (hits + misses)` as a percentage, two decimals
    pub hit_rate: f64,
    /// Sum of entry sizes in bytes
    pub total_size: usize,
    /// `total_size / entries`, zero when empty
    pub avg_entry_size: usize,
    /// Successful reads
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed under count or size pressure
    pub evictions: u64,
    /// Background refreshes that landed
    pub refreshes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the hit rate as a percentage rounded to two decimals.
    ///
    /// Returns 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            let percent = self.hits as f64 * 100.0 / total as f64;
            (percent * 100.0).round() / 100.0
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    // == Snapshot ==
    /// Returns a copy with occupancy and derived fields filled in.
    pub fn snapshot(&self, entries: usize, total_size: usize) -> Self {
        Self {
            entries,
            total_size,
            avg_entry_size: if entries == 0 { 0 } else { total_size / entries },
            hit_rate: self.hit_rate(),
            ..self.clone()
        }
    }
}
