//! Server configuration.
//!
//! Only the binary reads the environment. The library takes these values as
//! plain arguments.

use std::net::SocketAddr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::gbfs::FetchConfig;

/// Divvy (Chicago) GBFS 2.3 root directory.
pub const DEFAULT_DIRECTORY_URL: &str = "https://gbfs.divvybikes.com/gbfs/2.3/gbfs.json";

/// Default listen address.
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub directory_url: String,
    pub bind_addr: SocketAddr,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            fetch: FetchConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    ///
    /// - `GBFS_URL`: root directory URL
    /// - `BIND_ADDR`: listen address, e.g. `0.0.0.0:8080`
    /// - `CACHE_TTL_SECS`: how long a snapshot is reused
    /// - `FETCH_RETRIES`: attempts per feed document
    /// - `FETCH_RETRY_DELAY_MS`: pause between attempts
    /// - `FETCH_TIMEOUT_SECS`: per-request timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("GBFS_URL").filter(|u| !u.trim().is_empty()) {
            config.directory_url = url.trim().to_string();
        }
        if let Some(addr) = parse_var(&lookup, "BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(secs) = parse_var(&lookup, "CACHE_TTL_SECS")? {
            config.cache = config.cache.with_ttl(Duration::from_secs(secs));
        }
        if let Some(n) = parse_var(&lookup, "FETCH_RETRIES")? {
            config.fetch = config.fetch.with_max_attempts(n);
        }
        if let Some(ms) = parse_var(&lookup, "FETCH_RETRY_DELAY_MS")? {
            config.fetch = config.fetch.with_retry_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = parse_var(&lookup, "FETCH_TIMEOUT_SECS")? {
            config.fetch = config.fetch.with_timeout(secs);
        }

        Ok(config)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError {
                var,
                message: format!("{raw:?}: {e}"),
            })
        })
        .transpose()
}
