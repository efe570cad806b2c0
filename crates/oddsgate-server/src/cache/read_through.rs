//! Cache-aside read-through accessor.

use std::future::Future;
use std::time::Duration;

use oddsgate_core::{Cached, GatewayError};
use serde::{Serialize, de::DeserializeOwned};

use super::CacheBackend;

/// Look up `key`; on a hit return the deserialized value flagged
/// `fromCache`. On a miss run `fetch`, store the serialized result under
/// `key` with `ttl`, and return it flagged fresh.
///
/// A stored value that no longer deserializes is treated as a miss, never
/// surfaced to the caller: caching must not make the gateway less reliable
/// than running without one. A failed fetch propagates and writes nothing.
pub async fn read_through<T, F, Fut>(
    cache: &CacheBackend,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<Cached<T>, GatewayError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    if let Some(raw) = cache.get(key).await {
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                tracing::debug!(key = %key, "cache hit");
                return Ok(Cached::hit(value));
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "corrupt cache entry, treating as miss");
            }
        }
    }

    let value = fetch().await?;
    let encoded = serde_json::to_string(&value)?;
    cache.set(key, encoded, ttl).await;

    tracing::debug!(key = %key, ttl_secs = %ttl.as_secs(), "cache miss, stored fresh value");
    Ok(Cached::fetched(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oddsgate_core::Service;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ttl() -> Duration {
        Duration::from_secs(120)
    }

    /// Fetch closure returning `payload` and counting its invocations.
    fn counted(
        calls: &Arc<AtomicUsize>,
        payload: Value,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<Value, GatewayError>> + Send>>
    {
        let calls = Arc::clone(calls);
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(payload)
            })
        }
    }

    #[tokio::test]
    async fn test_first_call_misses_and_populates() {
        let cache = CacheBackend::new_local();
        let calls = Arc::new(AtomicUsize::new(0));
        let payload = json!({"events": [{"home": "X", "away": "Y"}]});

        let result: Cached<Value> =
            read_through(&cache, "event:42", ttl(), counted(&calls, payload.clone()))
                .await
                .unwrap();

        assert!(!result.from_cache);
        assert_eq!(result.data, payload);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.get("event:42").await.is_some());
    }

    #[tokio::test]
    async fn test_second_call_hits_with_identical_data() {
        let cache = CacheBackend::new_local();
        let calls = Arc::new(AtomicUsize::new(0));

        let first: Cached<Value> =
            read_through(&cache, "k", ttl(), counted(&calls, json!({"n": 1})))
                .await
                .unwrap();
        let second: Cached<Value> =
            read_through(&cache, "k", ttl(), counted(&calls, json!({"n": 2})))
                .await
                .unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        // The hit returns the stored payload, not the second fetch's result.
        assert_eq!(second.data, first.data);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_misses_again() {
        let cache = CacheBackend::new_local();
        let short = Duration::from_millis(40);

        let _: Cached<Value> = read_through(&cache, "k", short, || async move { Ok(json!(1)) })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(70)).await;

        let again: Cached<Value> = read_through(&cache, "k", short, || async move { Ok(json!(2)) })
            .await
            .unwrap();
        assert!(!again.from_cache);
        assert_eq!(again.data, json!(2));
    }

    #[tokio::test]
    async fn test_distinct_keys_are_isolated() {
        let cache = CacheBackend::new_local();

        let a: Cached<Value> =
            read_through(&cache, "markets:1", ttl(), || async move { Ok(json!("a")) })
                .await
                .unwrap();
        let b: Cached<Value> =
            read_through(&cache, "markets:2", ttl(), || async move { Ok(json!("b")) })
                .await
                .unwrap();

        assert!(!a.from_cache);
        assert!(!b.from_cache);

        let a_again: Cached<Value> =
            read_through(&cache, "markets:1", ttl(), || async move { Ok(json!("other")) })
                .await
                .unwrap();
        assert!(a_again.from_cache);
        assert_eq!(a_again.data, json!("a"));
    }

    #[tokio::test]
    async fn test_corrupt_entry_falls_through_to_fetch() {
        let cache = CacheBackend::new_local();
        cache.set("k", "{not json".to_string(), ttl()).await;

        let result: Cached<Value> =
            read_through(&cache, "k", ttl(), || async move { Ok(json!("fresh")) })
                .await
                .unwrap();

        assert!(!result.from_cache);
        assert_eq!(result.data, json!("fresh"));
        // The corrupt entry was replaced with the fresh value.
        assert_eq!(cache.get("k").await.as_deref(), Some("\"fresh\""));
    }

    #[tokio::test]
    async fn test_failed_fetch_propagates_and_caches_nothing() {
        let cache = CacheBackend::new_local();

        let result: Result<Cached<Value>, _> = read_through(&cache, "k", ttl(), || async move {
            Err(GatewayError::upstream_status(Service::Odds, 500))
        })
        .await;

        assert!(result.is_err());
        assert!(cache.get("k").await.is_none());
    }
}
