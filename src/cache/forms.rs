//! Memoized authorized-forms lookups
//!
//! Wraps any [`AuthorizationApi`] and keeps the most recently used results in
//! a bounded in-memory LRU map keyed by credential digest. Entries never expire
//! on a timer; they leave the cache only through eviction or [`clear`].
//!
//! [`clear`]: AuthorizationCache::clear

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;

use crate::cache::credential_key;
use crate::client::{ApiResult, AuthorizationApi, AuthorizedForm};

/// Number of distinct credentials retained by default
pub const DEFAULT_AUTH_CACHE_CAPACITY: usize = 32;

/// Bounded map with least-recently-used eviction.
struct LruMap<V> {
    capacity: usize,
    entries: HashMap<String, V>,
    order: VecDeque<String>,
}

impl<V: Clone> LruMap<V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.to_string());
    }

    fn get(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    /// Insert or replace, returning the evicted key if capacity was exceeded.
    fn insert(&mut self, key: String, value: V) -> Option<String> {
        let replaced = self.entries.insert(key.clone(), value).is_some();
        self.touch(&key);

        if replaced || self.entries.len() <= self.capacity {
            return None;
        }

        let evicted = self.order.pop_front()?;
        self.entries.remove(&evicted);
        Some(evicted)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.order.clear();
        count
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthCacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Caching wrapper for an authorization provider.
///
/// Safe to share between concurrent requests. A miss fetches outside the lock
/// and inserts afterwards, so two concurrent misses for one credential both
/// reach the provider and the later insert replaces the earlier one.
pub struct AuthorizationCache<C: AuthorizationApi> {
    inner: Arc<C>,
    entries: Mutex<LruMap<Vec<AuthorizedForm>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: AuthorizationApi> AuthorizationCache<C> {
    /// Wrap `inner`, retaining at most `capacity` credentials.
    pub fn new(inner: C, capacity: usize) -> Self {
        Self::from_arc(Arc::new(inner), capacity)
    }

    /// Wrap a shared client.
    pub fn from_arc(inner: Arc<C>, capacity: usize) -> Self {
        Self {
            inner,
            entries: Mutex::new(LruMap::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop every cached entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        self.entries.lock().map(|mut e| e.clear()).unwrap_or(0)
    }

    pub fn stats(&self) -> AuthCacheStats {
        let (entries, capacity) = self
            .entries
            .lock()
            .map(|e| (e.len(), e.capacity))
            .unwrap_or((0, 0));

        AuthCacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Lock the entries; a poisoned lock bypasses the cache.
    fn lock_entries(&self) -> Option<MutexGuard<'_, LruMap<Vec<AuthorizedForm>>>> {
        match self.entries.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                log::warn!("Authorization cache lock poisoned, bypassing cache");
                None
            }
        }
    }

    fn get_cached(&self, key: &str) -> Option<Vec<AuthorizedForm>> {
        self.lock_entries()?.get(key)
    }

    fn set_cached(&self, key: String, forms: Vec<AuthorizedForm>) {
        if let Some(mut guard) = self.lock_entries()
            && let Some(evicted) = guard.insert(key, forms)
        {
            log::debug!("Authorization cache evicted {}", &evicted[..8]);
        }
    }
}

#[async_trait]
impl<C: AuthorizationApi + 'static> AuthorizationApi for AuthorizationCache<C> {
    async fn get_authorized_forms(&self, credential: &str) -> ApiResult<Vec<AuthorizedForm>> {
        let key = credential_key(credential);

        if let Some(cached) = self.get_cached(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("Cache hit: authorized forms ({} forms)", cached.len());
            return Ok(cached);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let forms = self.inner.get_authorized_forms(credential).await?;
        self.set_cached(key, forms.clone());
        Ok(forms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAuthorizationClient;
    use crate::error::ApiError;

    #[test]
    fn test_lru_map_evicts_oldest() {
        let mut map = LruMap::new(2);
        assert_eq!(map.insert("a".to_string(), 1), None);
        assert_eq!(map.insert("b".to_string(), 2), None);
        assert_eq!(map.insert("c".to_string(), 3), Some("a".to_string()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_lru_map_get_refreshes_recency() {
        let mut map = LruMap::new(2);
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        assert_eq!(map.get("a"), Some(1));

        assert_eq!(map.insert("c".to_string(), 3), Some("b".to_string()));
        assert_eq!(map.get("a"), Some(1));
        assert_eq!(map.get("b"), None);
    }

    #[test]
    fn test_lru_map_replace_does_not_grow() {
        let mut map = LruMap::new(2);
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        assert_eq!(map.insert("a".to_string(), 10), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(10));
    }

    #[tokio::test]
    async fn test_repeated_lookup_is_served_from_cache() {
        let mock = MockAuthorizationClient::new()
            .with_forms("token-a", &["Leave", "Travel"])
            .await;
        let cache = AuthorizationCache::new(mock, DEFAULT_AUTH_CACHE_CAPACITY);

        let first = cache.get_authorized_forms("token-a").await.unwrap();
        let second = cache.get_authorized_forms("token-a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(cache.inner().call_count().await, 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_thirty_third_credential_evicts_least_recent() {
        let cache = AuthorizationCache::new(
            MockAuthorizationClient::new(),
            DEFAULT_AUTH_CACHE_CAPACITY,
        );

        for i in 0..32 {
            cache
                .get_authorized_forms(&format!("token-{}", i))
                .await
                .unwrap();
        }
        // Refresh token-0 so token-1 becomes the eviction candidate
        cache.get_authorized_forms("token-0").await.unwrap();
        assert_eq!(cache.inner().call_count().await, 32);

        cache.get_authorized_forms("token-32").await.unwrap();
        assert_eq!(cache.stats().entries, 32);

        cache.get_authorized_forms("token-0").await.unwrap();
        assert_eq!(cache.inner().calls_for("token-0").await, 1);

        cache.get_authorized_forms("token-1").await.unwrap();
        assert_eq!(cache.inner().calls_for("token-1").await, 2);
    }

    #[tokio::test]
    async fn test_poisoned_lock_falls_back_to_provider() {
        let mock = MockAuthorizationClient::new()
            .with_forms("token-a", &["Leave"])
            .await;
        let cache = AuthorizationCache::new(mock, 4);

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = cache.entries.lock().unwrap();
            panic!("poison the cache lock");
        }));
        assert!(poisoned.is_err());
        assert!(cache.entries.is_poisoned());

        for _ in 0..2 {
            let forms = cache.get_authorized_forms("token-a").await.unwrap();
            assert_eq!(forms, vec![AuthorizedForm::named("Leave")]);
        }
        assert_eq!(cache.inner().call_count().await, 2);
        assert_eq!(cache.stats().misses, 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mock = MockAuthorizationClient::new()
            .with_forms("token-a", &["Leave"])
            .await
            .with_error(ApiError::Network("refused".to_string()))
            .await;
        let cache = AuthorizationCache::new(mock, 4);

        assert!(cache.get_authorized_forms("token-a").await.is_err());
        let forms = cache.get_authorized_forms("token-a").await.unwrap();

        assert_eq!(forms.len(), 1);
        assert_eq!(cache.inner().call_count().await, 2);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let cache = AuthorizationCache::new(MockAuthorizationClient::new(), 4);
        cache.get_authorized_forms("token-a").await.unwrap();

        assert_eq!(cache.clear(), 1);
        cache.get_authorized_forms("token-a").await.unwrap();
        assert_eq!(cache.inner().call_count().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_respect_capacity() {
        let cache = Arc::new(AuthorizationCache::new(MockAuthorizationClient::new(), 8));

        let mut handles = Vec::new();
        for i in 0..40 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_authorized_forms(&format!("token-{}", i % 20))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.entries, 8);
        assert_eq!(stats.hits + stats.misses, 40);
    }
}
