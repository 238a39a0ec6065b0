//! Configuration Module
//!
//! Loads the cache manager's startup configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default TTL in seconds applied when a caller does not pass one.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default byte budget for the sum of all entry sizes (50 MiB).
pub const DEFAULT_MAX_SIZE: usize = 50 * 1024 * 1024;

/// Default entry-count budget.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for entries set without an explicit TTL
    pub default_ttl: u64,
    /// Maximum total serialized size of all entries, in bytes
    pub max_size: usize,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Port of the admin HTTP surface
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_MAX_SIZE` - Byte budget (default: 52428800)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: parse_var("CACHE_DEFAULT_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.default_ttl),
            max_size: parse_var("CACHE_MAX_SIZE").unwrap_or(defaults.max_size),
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Default TTL as a `Duration`.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL_SECS,
            max_size: DEFAULT_MAX_SIZE,
            max_entries: DEFAULT_MAX_ENTRIES,
            server_port: 3000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.max_size, 50 * 1024 * 1024);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CACHE_MAX_SIZE");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
    }
}
