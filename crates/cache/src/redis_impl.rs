//! Redis cache backend.
//!
//! `delete_pattern` walks `SCAN MATCH` and deletes keys one by one. It is not
//! atomic: a key created after the scan passed its slot survives.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};

use crate::error::map_redis_error;
use crate::{Cache, CacheError, Result};

/// Redis cache backend using a connection manager for reconnects.
///
/// Every command is bounded by `op_timeout`, so an unresponsive server fails
/// the call instead of stalling the request holding it.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Opens a connection and verifies it with `PING`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Timeout` if the server does not answer within
    /// `timeout`, or `CacheError::ConnectionFailed` if it refuses.
    pub async fn connect(info: impl IntoConnectionInfo, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(info).map_err(map_redis_error)?;
        let conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(timeout))?
            .map_err(map_redis_error)?;

        let cache = Self {
            conn,
            op_timeout: timeout,
        };
        cache.ping().await?;
        Ok(cache)
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>> + Send,
    {
        tokio::time::timeout(self.op_timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.op_timeout))?
            .map_err(map_redis_error)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        self.bounded(async move { conn.get::<_, Option<Vec<u8>>>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        self.bounded(async move {
            match ttl {
                Some(duration) => {
                    let seconds = duration.as_secs().max(1);
                    conn.set_ex::<_, _, ()>(key, value, seconds).await
                }
                None => conn.set::<_, _, ()>(key, value).await,
            }
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        self.bounded(async move { conn.del::<_, ()>(key).await })
            .await
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = self
            .bounded(async move {
                let mut iter = conn.scan_match::<_, String>(pattern).await?;
                let mut keys = Vec::new();
                while let Some(key) = iter.next_item().await {
                    keys.push(key);
                }
                Ok(keys)
            })
            .await?;

        for key in &keys {
            self.delete(key).await?;
        }

        tracing::debug!(pattern, deleted = keys.len(), "deleted keys by pattern");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let pong: String = self
            .bounded(async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        if pong != "PONG" {
            return Err(CacheError::OperationFailed(format!(
                "unexpected PING reply: {pong}"
            )));
        }
        Ok(())
    }
}
