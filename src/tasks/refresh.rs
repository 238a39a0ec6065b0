//! Background Refresh Task
//!
//! Runs a loader off the caller's path and lands its result in the cache.

use std::future::Future;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::{CacheManager, CacheOptions};

/// Spawns a fire-and-forget refresh of `key`.
///
/// The loader runs in its own task so a panic inside it is contained and
/// still releases the in-flight marker. Load, serialization and landing
/// failures are logged and dropped; the cached value stays as it was.
///
/// The caller must already have claimed the in-flight marker for `key`.
pub(crate) fn spawn_refresh_task<T, F, Fut>(
    manager: CacheManager,
    key: String,
    loader: F,
    options: CacheOptions,
) -> JoinHandle<()>
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = match tokio::spawn(loader()).await {
            Ok(Ok(loaded)) => serde_json::to_value(&loaded).map_err(anyhow::Error::from),
            Ok(Err(err)) => Err(err),
            Err(join_err) => Err(anyhow::anyhow!("loader task aborted: {join_err}")),
        };

        match outcome {
            Ok(value) => {
                if let Err(err) = manager.apply_refresh(&key, value, &options).await {
                    warn!(key = %key, error = %err, "Could not apply background refresh");
                }
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Background refresh failed, serving cached value");
            }
        }

        manager.release_refresh(&key).await;
    })
}
