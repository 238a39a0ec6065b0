//! Cache Manager Module
//!
//! Read-through façade over the store and dependency graph. Repositories hold
//! a cloned handle; all clones share one store behind a `RwLock`.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheOptions, CacheStats, CacheStore, DependencyGraph};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_refresh_task;

/// A background refresh is due once less than `1 / REFRESH_THRESHOLD_DIVISOR`
/// of the TTL remains.
const REFRESH_THRESHOLD_DIVISOR: u32 = 5;

// == Shared State ==
/// Everything a mutation must see atomically.
#[derive(Debug)]
struct CacheState {
    store: CacheStore,
    deps: DependencyGraph,
    /// Keys with a background refresh in flight
    refreshing: HashSet<String>,
}

impl CacheState {
    /// Stores `entry`, replacing the edges into `key` with `depends_on`.
    /// Evicted keys lose their incoming edges with them.
    fn insert(&mut self, key: String, entry: CacheEntry, depends_on: &[String]) {
        self.deps.remove_dependent(&key);
        for dependency in depends_on {
            self.deps.add(dependency, &key);
        }
        for evicted in self.store.insert(key, entry) {
            self.deps.remove_dependent(&evicted);
        }
    }

    fn get(&mut self, key: &str, now: Instant) -> Option<Arc<Value>> {
        let value = self.store.get(key, now);
        if value.is_none() {
            self.deps.remove_dependent(key);
        }
        value
    }

    /// Removes `key` and everything depending on it. Returns entries removed.
    fn invalidate(&mut self, key: &str) -> usize {
        let cascade = self.deps.cascade_from(key);
        let mut removed = 0;
        for k in &cascade {
            self.deps.remove_dependent(k);
            if self.store.remove(k).is_some() {
                removed += 1;
            }
        }

        if cascade.len() > 1 {
            info!(key, cascade = cascade.len() - 1, removed, "Invalidated with dependents");
        } else {
            debug!(key, removed, "Invalidated");
        }
        removed
    }
}

// == Cache Manager ==
/// Process-wide cache handle. Construct once at startup and pass clones to
/// whoever needs it.
#[derive(Debug, Clone)]
pub struct CacheManager {
    state: Arc<RwLock<CacheState>>,
    default_ttl: Duration,
}

impl CacheManager {
    // == Constructors ==
    /// Creates a manager with explicit limits.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries set without one; must be non-zero
    /// * `max_size` - Byte budget across all entries
    /// * `max_entries` - Entry count budget
    pub fn new(default_ttl: Duration, max_size: usize, max_entries: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState {
                store: CacheStore::new(max_entries, max_size),
                deps: DependencyGraph::new(),
                refreshing: HashSet::new(),
            })),
            default_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_ttl(), config.max_size, config.max_entries)
    }

    // == Get ==
    /// Returns the cached value, or `None` on miss or expiry.
    ///
    /// Never calls a loader. The returned `Arc` is shared with the cache and
    /// cannot be mutated through.
    pub async fn get(&self, key: &str) -> Option<Arc<Value>> {
        let value = self.state.write().await.get(key, Instant::now());
        debug!(key, hit = value.is_some(), "Cache lookup");
        value
    }

    /// `get` followed by decoding into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await {
            Some(value) => Ok(Some(T::deserialize(&*value)?)),
            None => Ok(None),
        }
    }

    /// Whether a valid entry exists. Does not count as an access.
    pub async fn contains(&self, key: &str) -> bool {
        self.state
            .read()
            .await
            .store
            .peek(key, Instant::now())
            .is_some()
    }

    // == Set ==
    /// Serializes `value` and stores it under `key`.
    ///
    /// May evict other entries first. Registers `options.depends_on` edges.
    pub async fn set<T>(&self, key: &str, value: &T, options: &CacheOptions) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value, options).await.map(|_| ())
    }

    async fn set_value(&self, key: &str, value: Value, options: &CacheOptions) -> Result<Arc<Value>> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }
        let ttl = self.resolve_ttl(options)?;
        let entry = CacheEntry::new(value, ttl, options.tags.clone(), Instant::now())?;
        let data = entry.data();
        let size = entry.size;

        self.state
            .write()
            .await
            .insert(key.to_string(), entry, &options.depends_on);

        debug!(key, size, ttl_ms = ttl.as_millis() as u64, "Cached");
        Ok(data)
    }

    fn resolve_ttl(&self, options: &CacheOptions) -> Result<Duration> {
        let ttl = options.ttl.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            return Err(CacheError::InvalidRequest(
                "TTL must be greater than zero".to_string(),
            ));
        }
        Ok(ttl)
    }

    // == Invalidation ==
    /// Removes `key` and cascades to every key registered as depending on it.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, key: &str) -> usize {
        self.state.write().await.invalidate(key)
    }

    /// Invalidates every entry tagged `tag`, each with its own cascade.
    pub async fn invalidate_by_tag(&self, tag: &str) -> usize {
        let mut state = self.state.write().await;
        let removed = state
            .store
            .keys_with_tag(tag)
            .iter()
            .map(|key| state.invalidate(key))
            .sum::<usize>();

        info!(tag, removed, "Invalidated by tag");
        removed
    }

    /// Drops all entries and dependency edges and resets counters.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.store.clear();
        state.deps.clear();
        info!("Cache cleared");
    }

    /// Removes expired entries now instead of waiting for their next access.
    pub async fn purge_expired(&self) -> usize {
        let mut state = self.state.write().await;
        let purged = state.store.purge_expired(Instant::now());
        for key in &purged {
            state.deps.remove_dependent(key);
        }
        purged.len()
    }

    // == Introspection ==
    pub async fn stats(&self) -> CacheStats {
        self.state.read().await.store.stats()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.state.read().await.store.keys()
    }

    pub async fn is_refreshing(&self, key: &str) -> bool {
        self.state.read().await.refreshing.contains(key)
    }

    // == Preload ==
    /// Read-through: returns the cached value unless `options.force` is set,
    /// otherwise awaits `loader`, stores its result and returns it.
    ///
    /// Loader errors propagate and nothing is stored.
    pub async fn preload<T, F, Fut>(
        &self,
        key: &str,
        loader: F,
        options: &CacheOptions,
    ) -> Result<Arc<Value>>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if !options.force {
            if let Some(value) = self.get(key).await {
                return Ok(value);
            }
        }

        let loaded = loader().await.map_err(CacheError::Loader)?;
        let value = serde_json::to_value(&loaded)?;
        self.set_value(key, value, options).await
    }

    /// Typed `preload`.
    pub async fn preload_as<T, F, Fut>(&self, key: &str, loader: F, options: &CacheOptions) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let value = self.preload(key, loader, options).await?;
        Ok(T::deserialize(&*value)?)
    }

    // == Background Refresh ==
    /// Schedules `loader` in the background if the entry for `key` has less
    /// than a fifth of its TTL left.
    ///
    /// Returns whether a refresh was scheduled. Nothing is scheduled for
    /// absent or expired keys, or while another refresh of the same key is
    /// in flight. Failures of the scheduled load are logged and dropped.
    pub async fn background_refresh<T, F, Fut>(
        &self,
        key: &str,
        loader: F,
        options: CacheOptions,
    ) -> bool
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let now = Instant::now();
        {
            let mut state = self.state.write().await;
            let due = state
                .store
                .peek(key, now)
                .is_some_and(|entry| entry.remaining(now) < entry.ttl / REFRESH_THRESHOLD_DIVISOR);

            if !due || !state.refreshing.insert(key.to_string()) {
                return false;
            }
        }

        debug!(key, "Scheduling background refresh");
        spawn_refresh_task(self.clone(), key.to_string(), loader, options);
        true
    }

    /// Lands a background load.
    ///
    /// An unchanged value on a still-valid entry only restarts its TTL; the
    /// stored value is kept as-is. Anything else replaces the entry. Keys
    /// invalidated while the load was running stay absent.
    pub(crate) async fn apply_refresh(&self, key: &str, value: Value, options: &CacheOptions) -> Result<()> {
        let now = Instant::now();
        let mut state = self.state.write().await;

        let Some(entry) = state.store.entry_mut(key) else {
            debug!(key, "Entry gone before refresh landed, discarding");
            return Ok(());
        };

        if entry.is_valid(now) && !entry.has_changed(&value)? {
            entry.revalidate(now);
            state.store.record_refresh();
            debug!(key, "Refresh unchanged, TTL restarted");
            return Ok(());
        }

        let ttl = self.resolve_ttl(options)?;
        let replacement = CacheEntry::new(value, ttl, options.tags.clone(), now)?;
        state.insert(key.to_string(), replacement, &options.depends_on);
        state.store.record_refresh();
        debug!(key, "Refresh replaced entry");
        Ok(())
    }

    pub(crate) async fn release_refresh(&self, key: &str) {
        self.state.write().await.refreshing.remove(key);
    }
}
