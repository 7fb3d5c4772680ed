use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache. L2 is Redis and is optional. When Redis is
/// configured it is the only tier, so every instance sees the same
/// invalidations; without it the manager serves and invalidates L1.
///
/// Read-through fills go through [`CacheManager::set_if_fresh`] with a
/// [`CacheToken`] taken before the store read. Every [`CacheManager::delete`]
/// bumps a generation counter, so a fill that raced with an invalidation is
/// dropped instead of caching the row it read before the write.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
    generation: tokio::sync::Mutex<u64>,
}

/// Invalidation generation observed before a store read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheToken(u64);

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            ..Self::in_memory(l1_size, ttl_secs)
        })
    }

    /// Create a cache manager with the L1 tier only
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis: None,
            l1_cache,
            ttl_secs,
            generation: tokio::sync::Mutex::new(0),
        }
    }

    /// Snapshot the invalidation generation; take it before reading the store
    pub async fn token(&self) -> CacheToken {
        CacheToken(*self.generation.lock().await)
    }

    /// Get a value from the shared tier (Redis if configured, else L1)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);
                return Ok(serde_json::from_str(&json)?);
            }
        } else if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value unconditionally
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async::<()>(&mut *conn)
                .await?;
        } else {
            self.l1_cache.insert(key.to_string(), json.into_bytes()).await;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Set a value read under `token`, unless an invalidation happened since
    ///
    /// Returns `Ok(false)` when the write was skipped.
    pub async fn set_if_fresh<T>(
        &self,
        key: &str,
        value: &T,
        token: CacheToken,
    ) -> Result<bool, CacheError>
    where
        T: Serialize,
    {
        // Held across the write so a delete cannot slip in between
        let generation = self.generation.lock().await;
        if *generation != token.0 {
            tracing::trace!("Skipping stale cache fill: {}", key);
            return Ok(false);
        }

        self.set(key, value).await?;
        Ok(true)
    }

    /// Invalidate a key and start a new generation
    ///
    /// Across instances sharing Redis, a fill that read the store before
    /// another instance's write can still land after its delete; that entry
    /// lives at most `ttl_secs`.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut generation = self.generation.lock().await;
        *generation = generation.wrapping_add(1);

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut *conn)
                .await?;
        } else {
            self.l1_cache.invalidate(key).await;
        }

        Ok(())
    }

    pub fn has_redis(&self) -> bool {
        self.redis.is_some()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a single address
    pub fn address(id: i64) -> String {
        format!("address:{}", id)
    }
}
