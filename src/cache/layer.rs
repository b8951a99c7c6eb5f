//! Resolver-facing cache wrapper
//!
//! The cache is an optimization, never a source of truth: every store error
//! is swallowed here and logged at debug level, so a broken cache can only
//! cost performance.

use super::store::CacheStore;
use crate::config::schema::CacheConfig;
use crate::resolver::Source;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// TTLs per kind of data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Seconds to keep data that came from D6
    pub real_data_secs: u64,
    /// Seconds to keep synthetic data
    pub mock_data_secs: u64,
}

impl TtlPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            real_data_secs: config.real_data_ttl_secs,
            mock_data_secs: config.mock_data_ttl_secs,
        }
    }

    /// TTL governing a write of data produced by `source`
    pub fn ttl_for(&self, source: Source) -> u64 {
        match source {
            Source::UpstreamV2 | Source::UpstreamV1 => self.real_data_secs,
            Source::Mock => self.mock_data_secs,
            // Re-writing a cache hit keeps the short TTL
            Source::Cache => self.mock_data_secs,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

/// Counters reported by the health snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub backend: String,
    pub entries: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub errors: u64,
}

/// Error-swallowing cache with TTL policy and counters
pub struct ResolverCache {
    store: Arc<dyn CacheStore>,
    policy: TtlPolicy,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
}

impl ResolverCache {
    pub fn new(store: Arc<dyn CacheStore>, policy: TtlPolicy) -> Self {
        Self {
            store,
            policy,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> TtlPolicy {
        self.policy
    }

    /// Underlying store, for maintenance commands
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Read a fresh value; errors read as a miss
    pub async fn lookup(&self, key: &str) -> Option<Value> {
        match self.store.get(key).await {
            Ok(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache read for {} failed: {}", key, e);
                None
            }
        }
    }

    /// Write a value with the TTL for its source; returns whether it stuck
    pub async fn store_value(&self, key: &str, value: Value, source: Source) -> bool {
        let ttl = self.policy.ttl_for(source);
        match self.store.set(key, value, ttl, source).await {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                debug!("Cache write for {} failed: {}", key, e);
                false
            }
        }
    }

    /// Remove every key with the prefix; failures count as zero removed
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        match self.store.delete_by_prefix(prefix).await {
            Ok(n) => n,
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                debug!("Cache invalidation of {} failed: {}", prefix, e);
                0
            }
        }
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            backend: self.store.backend_name().to_string(),
            entries: self.store.len().await.ok(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, MemoryCacheStore};
    use crate::error::{BridgeError, BridgeResult};
    use async_trait::async_trait;
    use serde_json::json;

    /// Store whose backing service is down
    struct UnreachableStore;

    #[async_trait]
    impl CacheStore for UnreachableStore {
        async fn get_entry(&self, _key: &str) -> BridgeResult<Option<CacheEntry>> {
            Err(BridgeError::Cache("connection refused".to_string()))
        }
        async fn put(&self, _entry: CacheEntry) -> BridgeResult<()> {
            Err(BridgeError::Cache("connection refused".to_string()))
        }
        async fn delete(&self, _key: &str) -> BridgeResult<bool> {
            Err(BridgeError::Cache("connection refused".to_string()))
        }
        async fn delete_by_prefix(&self, _prefix: &str) -> BridgeResult<usize> {
            Err(BridgeError::Cache("connection refused".to_string()))
        }
        async fn len(&self) -> BridgeResult<usize> {
            Err(BridgeError::Cache("connection refused".to_string()))
        }
        fn backend_name(&self) -> &'static str {
            "unreachable"
        }
    }

    #[test]
    fn ttl_depends_on_source() {
        let policy = TtlPolicy {
            real_data_secs: 3600,
            mock_data_secs: 300,
        };
        assert_eq!(policy.ttl_for(Source::UpstreamV2), 3600);
        assert_eq!(policy.ttl_for(Source::UpstreamV1), 3600);
        assert_eq!(policy.ttl_for(Source::Mock), 300);
    }

    #[tokio::test]
    async fn counts_hits_and_misses() {
        let cache = ResolverCache::new(Arc::new(MemoryCacheStore::new()), TtlPolicy::default());

        assert!(cache.lookup("d6:schools").await.is_none());
        assert!(cache.store_value("d6:schools", json!([]), Source::Mock).await);
        assert_eq!(cache.lookup("d6:schools").await, Some(json!([])));

        let stats = cache.stats().await;
        assert_eq!(stats.backend, "memory");
        assert_eq!(stats.entries, Some(1));
        assert_eq!((stats.hits, stats.misses, stats.writes), (1, 1, 1));
    }

    #[tokio::test]
    async fn mock_entry_expires_before_upstream_entry() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = ResolverCache::new(store.clone(), TtlPolicy::default());

        cache.store_value("real", json!(1), Source::UpstreamV2).await;
        cache.store_value("mock", json!(1), Source::Mock).await;

        let real = store.get_entry("real").await.unwrap().unwrap();
        let mock = store.get_entry("mock").await.unwrap().unwrap();
        assert!(mock.expires_at < real.expires_at);
    }

    #[tokio::test]
    async fn unreachable_store_never_errors() {
        let cache = ResolverCache::new(Arc::new(UnreachableStore), TtlPolicy::default());

        assert!(cache.lookup("d6:schools").await.is_none());
        assert!(!cache.store_value("d6:schools", json!([]), Source::Mock).await);
        assert_eq!(cache.invalidate_prefix("d6:").await, 0);

        let stats = cache.stats().await;
        assert_eq!(stats.errors, 3);
        assert_eq!(stats.entries, None);
    }
}
