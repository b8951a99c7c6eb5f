//! In-process cache backend

use super::store::{CacheEntry, CacheStore};
use crate::error::BridgeResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Map-backed store; entries live as long as the process
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_entry(&self, key: &str) -> BridgeResult<Option<CacheEntry>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it unless a writer replaced it meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired()) {
            entries.remove(key);
            debug!("Evicted expired cache entry {}", key);
        }
        Ok(None)
    }

    async fn put(&self, entry: CacheEntry) -> BridgeResult<()> {
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BridgeResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> BridgeResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }

    async fn len(&self) -> BridgeResult<usize> {
        Ok(self.entries.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Source;
    use serde_json::json;

    #[tokio::test]
    async fn set_and_get() {
        let store = MemoryCacheStore::new();
        store
            .set("d6:lookup:genders", json!([{"id": "M"}]), 60, Source::UpstreamV2)
            .await
            .unwrap();

        let value = store.get("d6:lookup:genders").await.unwrap().unwrap();
        assert_eq!(value, json!([{"id": "M"}]));

        let entry = store.get_entry("d6:lookup:genders").await.unwrap().unwrap();
        assert_eq!(entry.source, Source::UpstreamV2);
    }

    #[tokio::test]
    async fn missing_returns_none() {
        let store = MemoryCacheStore::new();
        assert!(store.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_is_a_miss_and_evicted() {
        let store = MemoryCacheStore::new();
        store
            .set("d6:schools", json!([]), 0, Source::Mock)
            .await
            .unwrap();
        assert_eq!(store.len().await.unwrap(), 1);

        assert!(store.get("d6:schools").await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn overwrite_last_write_wins() {
        let store = MemoryCacheStore::new();
        store.set("k", json!(1), 60, Source::Mock).await.unwrap();
        store.set("k", json!(2), 60, Source::UpstreamV1).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn delete_and_delete_by_prefix() {
        let store = MemoryCacheStore::new();
        for key in [
            "d6:learners:school=1000",
            "d6:learners:school=1001",
            "d6:staff:school=1000",
        ] {
            store.set(key, json!([]), 60, Source::Mock).await.unwrap();
        }

        assert!(store.delete("d6:staff:school=1000").await.unwrap());
        assert!(!store.delete("d6:staff:school=1000").await.unwrap());
        assert_eq!(store.delete_by_prefix("d6:learners:").await.unwrap(), 2);
        assert_eq!(store.len().await.unwrap(), 0);
    }
}
