//! Caching layer: a key/value store with per-key expiry plus the
//! cache-aside read-through accessor the route handlers go through.
//!
//! The store runs in one of two modes:
//!
//! - **Local**: in-memory DashMap, per-instance.
//! - **Redis**: shared across instances, local tier in front.
//!
//! If Redis is disabled or unreachable at startup, the gateway falls back
//! to local-only mode and keeps serving.

pub mod backend;
pub mod read_through;

pub use backend::{CacheBackend, CachedEntry};
pub use read_through::read_through;

use crate::config::RedisConfig;

/// Create a cache backend based on configuration.
///
/// Redis disabled → local-only. Redis enabled → attempt to connect, fall
/// back to local-only (with a warning) if the pool cannot be created or the
/// first connection fails.
pub async fn create_cache_backend(config: &RedisConfig) -> CacheBackend {
    use std::time::Duration;

    if !config.enabled {
        tracing::info!("redis disabled, using local cache only");
        return CacheBackend::new_local();
    }

    tracing::info!(url = %config.url, "connecting to redis");

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    if let Some(ref mut pool_config) = redis_config.pool {
        pool_config.max_size = config.pool_size;
        pool_config.timeouts.wait = Some(Duration::from_millis(config.timeout_ms));
        pool_config.timeouts.create = Some(Duration::from_millis(config.timeout_ms));
        pool_config.timeouts.recycle = Some(Duration::from_millis(config.timeout_ms));
    }

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "failed to create redis pool, falling back to local cache");
            return CacheBackend::new_local();
        }
    };

    match pool.get().await {
        Ok(_) => {
            tracing::info!("connected to redis");
            CacheBackend::new_redis(pool)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to connect to redis, falling back to local cache");
            CacheBackend::new_local()
        }
    }
}
