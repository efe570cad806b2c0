//! Cache store: local DashMap, optionally backed by Redis.

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cached JSON-encoded value with its expiry window.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub value: Arc<str>,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            stored_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// Key/value store with per-key expiry. Values are JSON-encoded strings.
///
/// ## Modes
///
/// - **Local**: single-instance, in-memory only. Expiry is checked on read;
///   expired entries are evicted lazily.
/// - **Redis**: shared across gateway instances. Writes go to both tiers
///   (`SET key value EX ttl` on the Redis side, fire-and-forget); reads
///   check the local tier first, then Redis. Redis hits are not copied into
///   the local tier: the local entry would get a fresh TTL window and could
///   outlive the entry's real expiry.
///
/// Entries are never explicitly invalidated; expiry is the only removal
/// path. Redis errors degrade to a miss so a cache outage never makes the
/// gateway less reliable than running without a cache.
#[derive(Clone)]
pub enum CacheBackend {
    Local(Arc<DashMap<String, CachedEntry>>),
    Redis {
        redis: Pool,
        local: Arc<DashMap<String, CachedEntry>>,
    },
}

impl CacheBackend {
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    pub fn new_redis(redis_pool: Pool) -> Self {
        CacheBackend::Redis {
            redis: redis_pool,
            local: Arc::new(DashMap::new()),
        }
    }

    /// Look up a key. Absent and expired entries both read as `None`.
    pub async fn get(&self, key: &str) -> Option<Arc<str>> {
        match self {
            CacheBackend::Local(map) => read_local(map, key),
            CacheBackend::Redis { redis, local } => {
                if let Some(value) = read_local(local, key) {
                    tracing::debug!(key = %key, "cache hit (local)");
                    return Some(value);
                }

                match redis.get().await {
                    Ok(mut conn) => match conn.get::<_, Option<String>>(key).await {
                        Ok(Some(value)) => {
                            tracing::debug!(key = %key, "cache hit (redis)");
                            Some(value.into())
                        }
                        Ok(None) => None,
                        Err(e) => {
                            tracing::warn!(key = %key, error = %e, "redis GET error");
                            None
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to get redis connection");
                        None
                    }
                }
            }
        }
    }

    /// Store a value under a key with a relative TTL.
    pub async fn set(&self, key: &str, value: String, ttl: Duration) {
        match self {
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
            }
            CacheBackend::Redis { redis, local } => {
                let entry = CachedEntry::new(value, ttl);
                let value_for_redis = Arc::clone(&entry.value);
                local.insert(key.to_string(), entry);

                // Redis write is fire-and-forget; the local tier already
                // holds the entry for this instance.
                let redis = redis.clone();
                let key = key.to_string();
                let ttl_secs = ttl.as_secs();
                tokio::spawn(async move {
                    if let Ok(mut conn) = redis.get().await {
                        if let Err(e) = conn
                            .set_ex::<_, _, ()>(&key, &*value_for_redis, ttl_secs)
                            .await
                        {
                            tracing::warn!(key = %key, error = %e, "redis SETEX error");
                        } else {
                            tracing::debug!(key = %key, ttl_secs = %ttl_secs, "cache set");
                        }
                    }
                });
            }
        }
    }
}

fn read_local(map: &DashMap<String, CachedEntry>, key: &str) -> Option<Arc<str>> {
    if let Some(entry) = map.get(key) {
        if !entry.is_expired() {
            return Some(Arc::clone(&entry.value));
        }
        drop(entry);
        map.remove(key);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_get_set() {
        let cache = CacheBackend::new_local();

        cache
            .set("k", "\"value\"".to_string(), Duration::from_secs(60))
            .await;

        let value = cache.get("k").await;
        assert_eq!(value.as_deref(), Some("\"value\""));
    }

    #[tokio::test]
    async fn test_absent_key_is_none() {
        let cache = CacheBackend::new_local();
        assert!(cache.get("nothing-here").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_miss() {
        let cache = CacheBackend::new_local();

        cache
            .set("short", "1".to_string(), Duration::from_millis(50))
            .await;
        assert!(cache.get("short").await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("short").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let cache = CacheBackend::new_local();

        cache
            .set("gone", "1".to_string(), Duration::from_millis(10))
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = cache.get("gone").await;

        if let CacheBackend::Local(map) = &cache {
            assert!(!map.contains_key("gone"));
        }
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = CacheBackend::new_local();

        cache
            .set("k", "\"old\"".to_string(), Duration::from_secs(60))
            .await;
        cache
            .set("k", "\"new\"".to_string(), Duration::from_secs(60))
            .await;

        assert_eq!(cache.get("k").await.as_deref(), Some("\"new\""));
    }
}
