//! Stale-while-revalidate cache for the collection API proxy.
//!
//! Requests under the API prefix are forwarded to the upstream origin.
//! Within `max_age` a cached copy is served directly; after that the stale
//! copy is still served immediately while a single background task
//! refreshes the entry. Only successful responses are cached.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use galeria_api::{ApiError, CollectionClient, UpstreamResponse};

/// Proxy settings for the collection API.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Path prefix the proxy is mounted under.
    pub prefix: String,

    /// Upstream origin requests are forwarded to.
    pub upstream: String,

    /// How long a cached response counts as fresh.
    pub max_age: Duration,

    /// Maximum number of cached responses.
    pub capacity: NonZeroUsize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            upstream: "https://www.webumenia.sk/api".to_string(),
            max_age: Duration::from_secs(60),
            capacity: NonZeroUsize::new(256).expect("nonzero capacity"),
        }
    }
}

/// A cached upstream response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Arc<Vec<u8>>,
    pub(crate) fetched_at: Instant,
}

impl CachedResponse {
    fn from_upstream(upstream: UpstreamResponse) -> Self {
        Self {
            status: upstream.status,
            content_type: upstream.content_type,
            body: Arc::new(upstream.body),
            fetched_at: Instant::now(),
        }
    }

    /// Only plain successes are worth keeping; errors pass through
    /// uncached so a transient failure is not served stale for `max_age`.
    pub fn cacheable(&self) -> bool {
        self.status == 200
    }

    fn freshness(&self, max_age: Duration) -> Freshness {
        if self.fetched_at.elapsed() < max_age {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

/// Freshness of a cache hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Bounded response cache with stale-while-revalidate semantics.
pub struct SwrCache {
    max_age: Duration,
    entries: Mutex<LruCache<String, CachedResponse>>,
    revalidating: Mutex<HashSet<String>>,
}

impl SwrCache {
    pub fn new(capacity: NonZeroUsize, max_age: Duration) -> Self {
        Self {
            max_age,
            entries: Mutex::new(LruCache::new(capacity)),
            revalidating: Mutex::new(HashSet::new()),
        }
    }

    /// Look up a cached response and how fresh it is.
    pub async fn lookup(&self, key: &str) -> Option<(CachedResponse, Freshness)> {
        let mut entries = self.entries.lock().await;
        entries
            .get(key)
            .map(|entry| (entry.clone(), entry.freshness(self.max_age)))
    }

    pub async fn insert(&self, key: &str, response: CachedResponse) {
        self.entries.lock().await.put(key.to_string(), response);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Claim the revalidation slot for a key. Returns false when another
    /// task is already refreshing it.
    pub async fn begin_revalidation(&self, key: &str) -> bool {
        self.revalidating.lock().await.insert(key.to_string())
    }

    pub async fn finish_revalidation(&self, key: &str) {
        self.revalidating.lock().await.remove(key);
    }
}

/// Fetch a resource from upstream and cache it when cacheable.
pub async fn fetch_and_store(
    cache: &SwrCache,
    client: &CollectionClient,
    key: &str,
) -> Result<CachedResponse, ApiError> {
    let upstream = client.fetch_raw(key).await?;
    let response = CachedResponse::from_upstream(upstream);
    if response.cacheable() {
        cache.insert(key, response.clone()).await;
    }
    Ok(response)
}

/// Refresh a stale entry in the background. At most one refresh per key is
/// in flight; extra stale hits keep serving the old copy.
pub fn spawn_revalidation(cache: Arc<SwrCache>, client: CollectionClient, key: String) {
    tokio::spawn(async move {
        if !cache.begin_revalidation(&key).await {
            return;
        }
        tracing::debug!("revalidating {key}");
        if let Err(err) = fetch_and_store(&cache, &client, &key).await {
            // Keep serving the stale copy; the next stale hit retries.
            tracing::warn!("Revalidation of {key} failed: {err}");
        }
        cache.finish_revalidation(&key).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(status: u16, body: &str) -> CachedResponse {
        CachedResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: Arc::new(body.as_bytes().to_vec()),
            fetched_at: Instant::now(),
        }
    }

    fn cache(capacity: usize, max_age_secs: u64) -> SwrCache {
        SwrCache::new(
            NonZeroUsize::new(capacity).unwrap(),
            Duration::from_secs(max_age_secs),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entries_are_served_fresh() {
        let cache = cache(4, 60);
        cache.insert("items/1", cached(200, "{}")).await;

        tokio::time::advance(Duration::from_secs(59)).await;

        let (entry, freshness) = cache.lookup("items/1").await.unwrap();
        assert_eq!(freshness, Freshness::Fresh);
        assert_eq!(entry.status, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_go_stale_after_max_age() {
        let cache = cache(4, 60);
        cache.insert("items/1", cached(200, "{}")).await;

        tokio::time::advance(Duration::from_secs(61)).await;

        let (_, freshness) = cache.lookup("items/1").await.unwrap();
        assert_eq!(freshness, Freshness::Stale);
    }

    #[tokio::test]
    async fn capacity_evicts_the_least_recently_used_entry() {
        let cache = cache(2, 60);
        cache.insert("a", cached(200, "a")).await;
        cache.insert("b", cached(200, "b")).await;
        cache.insert("c", cached(200, "c")).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.lookup("a").await.is_none());
        assert!(cache.lookup("c").await.is_some());
    }

    #[tokio::test]
    async fn revalidation_slot_admits_a_single_task() {
        let cache = cache(4, 60);

        assert!(cache.begin_revalidation("items/1").await);
        assert!(!cache.begin_revalidation("items/1").await);

        cache.finish_revalidation("items/1").await;
        assert!(cache.begin_revalidation("items/1").await);
    }

    #[test]
    fn only_plain_successes_are_cacheable() {
        assert!(cached(200, "{}").cacheable());
        assert!(!cached(404, "not found").cacheable());
        assert!(!cached(500, "boom").cacheable());
    }
}
