//! Per-call options for `set`, `preload` and `background_refresh`.

use std::collections::HashSet;
use std::time::Duration;

/// Options recognized by the cache manager.
///
/// `force` is only read by `preload`.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Entry lifetime; the manager's default TTL when `None`
    pub ttl: Option<Duration>,
    /// Labels for `invalidate_by_tag`
    pub tags: HashSet<String>,
    /// Keys whose invalidation must also invalidate this entry
    pub depends_on: Vec<String>,
    /// Skip the cached value and always call the loader
    pub force: bool,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.depends_on.push(key.into());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
