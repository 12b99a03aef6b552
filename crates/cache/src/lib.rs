//! Cache-aside gateway.
//!
//! Values are opaque byte payloads; callers own (de)serialization. Two
//! backends share the [`Cache`] contract: [`RedisCache`] for deployments and
//! [`MemoryCache`] for local runs and tests. The backend is picked at startup
//! from [`CacheSettings::backend`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

mod config;
mod error;
mod memory;
mod patterns;
mod redis_impl;

pub use config::{CacheBackend, CacheSettings};
pub use error::{CacheError, Result};
pub use memory::MemoryCache;
pub use patterns::pattern_matches;
pub use redis_impl::RedisCache;

/// Basic key-value cache operations.
///
/// Each call is atomic for a single key. `delete_pattern` is the exception:
/// it scans then deletes key by key, so a key written concurrently may
/// survive it.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key; `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all values whose key matches a glob (e.g. `driver:*`).
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;

    /// Verifies the backend is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Build the configured backend and verify it answers within the
/// connect timeout.
pub async fn connect(settings: &CacheSettings) -> Result<Arc<dyn Cache>> {
    match settings.backend {
        CacheBackend::Redis => {
            tracing::info!(
                host = %settings.host,
                port = settings.port,
                db = settings.db,
                "connecting to redis"
            );
            let cache = RedisCache::connect(settings.connection_info(), settings.connect_timeout()).await?;
            tracing::info!("redis cache connected");
            Ok(Arc::new(cache))
        }
        CacheBackend::Memory => {
            tracing::info!(capacity = settings.memory_capacity, "using in-memory cache");
            Ok(Arc::new(MemoryCache::new(settings.memory_capacity)))
        }
    }
}
