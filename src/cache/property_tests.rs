//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store bounds, stats, and key canonicalization.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;

use crate::cache::{keys, CacheEntry, CacheStore, DependencyGraph};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_MAX_SIZE: usize = 1 << 20;
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

fn put(store: &mut CacheStore, key: &str, value: Value) {
    let entry = CacheEntry::new(value, TEST_TTL, HashSet::new(), Instant::now()).unwrap();
    store.insert(key.to_string(), entry);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses reported by stats match what the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, TEST_MAX_SIZE);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => put(&mut store, &key, json!(value)),
                CacheOp::Get { key } => match store.get(&key, Instant::now()) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Remove { key } => {
                    store.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.entries, store.len(), "Entry count mismatch");

        let total = expected_hits + expected_misses;
        let expected_rate = if total == 0 {
            0.0
        } else {
            (expected_hits as f64 * 100.0 / total as f64 * 100.0).round() / 100.0
        };
        prop_assert_eq!(stats.hit_rate, expected_rate);
    }

    // The entry count never exceeds the configured maximum.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(max_entries, TEST_MAX_SIZE);

        for (key, value) in entries {
            put(&mut store, &key, json!(value));
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }

    // Total size stays within budget unless a single entry alone exceeds it.
    #[test]
    fn prop_size_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..100)
    ) {
        let max_size = 2048;
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, max_size);

        for (key, value) in entries {
            put(&mut store, &key, json!(value));
            prop_assert!(store.total_size() <= max_size || store.len() == 1);
        }
    }

    // Recorded size tracks the sum of live entries through overwrites and removals.
    #[test]
    fn prop_total_size_matches_entries(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, TEST_MAX_SIZE);
        let mut model: HashMap<String, usize> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let size = serde_json::to_vec(&json!(value)).unwrap().len();
                    put(&mut store, &key, json!(value));
                    model.insert(key, size);
                }
                CacheOp::Remove { key } => {
                    store.remove(&key);
                    model.remove(&key);
                }
                CacheOp::Get { .. } => {}
            }
        }

        prop_assert_eq!(store.total_size(), model.values().sum::<usize>());
        prop_assert_eq!(store.len(), model.len());
    }

    // Criteria maps built in any order produce the same key.
    #[test]
    fn prop_filtered_key_canonical(
        criteria in prop::collection::hash_map("[a-z]{1,8}", 0i64..1000, 0..8)
    ) {
        let mut forward: Vec<(String, i64)> = criteria.into_iter().collect();
        let mut backward = forward.clone();
        forward.sort();
        backward.sort();
        backward.reverse();

        let build = |pairs: &[(String, i64)]| {
            let mut map = Map::new();
            for (k, v) in pairs {
                map.insert(k.clone(), json!(v));
            }
            Value::Object(map)
        };

        prop_assert_eq!(
            keys::entity_filtered_key("students", &build(&forward)),
            keys::entity_filtered_key("students", &build(&backward))
        );
        prop_assert_eq!(
            keys::aggregation_key("students", "count", &build(&forward)),
            keys::aggregation_key("students", "count", &build(&backward))
        );
    }

    // A chain of dependencies cascades to its end from any starting link.
    #[test]
    fn prop_cascade_reaches_chain_tail(len in 1usize..20, start in 0usize..20) {
        prop_assume!(start < len);
        let mut graph = DependencyGraph::new();
        for i in 0..len {
            graph.add(&format!("k{i}"), &format!("k{}", i + 1));
        }

        let cascade = graph.cascade_from(&format!("k{start}"));
        prop_assert_eq!(cascade.len(), len + 1 - start);
        prop_assert_eq!(cascade.last().cloned(), Some(format!("k{len}")));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling to capacity then inserting a new key evicts the least recently accessed key.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::hash_set(valid_key_strategy(), 2..10),
        new_key in valid_key_strategy(),
        new_value in valid_value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys.into_iter().collect();
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = CacheStore::new(capacity, TEST_MAX_SIZE);
        for key in &unique_keys {
            put(&mut store, key, json!(format!("value_{key}")));
        }

        // Touch the first key, so the second becomes the eviction candidate
        let accessed_key = unique_keys[0].clone();
        let expected_evicted = unique_keys[1].clone();
        prop_assert!(store.get(&accessed_key, Instant::now()).is_some());

        put(&mut store, &new_key, json!(new_value));

        let now = Instant::now();
        prop_assert_eq!(store.len(), capacity);
        prop_assert!(store.peek(&accessed_key, now).is_some());
        prop_assert!(store.peek(&expected_evicted, now).is_none());
        prop_assert!(store.peek(&new_key, now).is_some());
    }
}
