//! LRU Tracker Module
//!
//! Orders keys by last access so count-pressure eviction can pick the
//! least-recently-accessed share of the store.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Insertion counts as an access, so the order always matches
/// `last_accessed_at`, with ties resolved by call order.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Oldest ==
    /// Returns up to `count` keys, least recently used first, without
    /// removing them.
    pub fn oldest(&self, count: usize) -> Vec<String> {
        self.order.iter().rev().take(count).cloned().collect()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
    }

    #[test]
    fn test_oldest_in_insertion_order() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        assert_eq!(lru.oldest(2), vec!["key1".to_string(), "key2".to_string()]);
        assert_eq!(lru.len(), 3, "oldest() must not remove keys");
    }

    #[test]
    fn test_touch_existing_key_moves_to_front() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        // front=[a, c, b]=back
        assert_eq!(lru.len(), 3);
        assert_eq!(lru.oldest(3), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_oldest_more_than_tracked() {
        let mut lru = LruTracker::new();
        lru.touch("only");

        assert_eq!(lru.oldest(10), vec!["only".to_string()]);
        assert!(LruTracker::new().oldest(3).is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.remove("key1");
        lru.remove("nonexistent");

        assert!(!lru.contains("key1"));
        assert!(lru.contains("key2"));

        lru.clear();
        assert!(lru.is_empty());
    }
}
