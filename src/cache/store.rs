//! Cache store contract
//!
//! Values are immutable JSON snapshots, so concurrent writers are safe with
//! last-write-wins semantics. Expiry is enforced lazily on read; there is no
//! background sweep.

use crate::error::BridgeResult;
use crate::resolver::Source;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest TTL honoured (ten years); larger values are clamped
const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// A cached value with its expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    pub expires_at: DateTime<Utc>,
    /// Tier that produced the value
    pub source: Source,
}

impl CacheEntry {
    pub fn new(key: &str, value: Value, ttl_secs: u64, source: Source) -> Self {
        let secs = i64::try_from(ttl_secs).unwrap_or(MAX_TTL_SECS).min(MAX_TTL_SECS);
        let ttl = Duration::seconds(secs);
        Self {
            key: key.to_string(),
            value,
            expires_at: Utc::now() + ttl,
            source,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Key/value store with per-entry TTL
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry; expired or absent keys are a miss, not an error
    async fn get_entry(&self, key: &str) -> BridgeResult<Option<CacheEntry>>;

    /// Store an entry, replacing any previous value for the key
    async fn put(&self, entry: CacheEntry) -> BridgeResult<()>;

    /// Remove a key, returning whether it existed
    async fn delete(&self, key: &str) -> BridgeResult<bool>;

    /// Remove every key starting with `prefix`, returning the count
    async fn delete_by_prefix(&self, prefix: &str) -> BridgeResult<usize>;

    /// Number of stored entries (expired ones included until read)
    async fn len(&self) -> BridgeResult<usize>;

    /// Human-readable backend name
    fn backend_name(&self) -> &'static str;

    async fn get(&self, key: &str) -> BridgeResult<Option<Value>> {
        Ok(self.get_entry(key).await?.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: Value, ttl_secs: u64, source: Source) -> BridgeResult<()> {
        self.put(CacheEntry::new(key, value, ttl_secs, source)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_expiry() {
        let entry = CacheEntry::new("d6:schools", json!([]), 60, Source::UpstreamV2);
        assert!(!entry.is_expired());
        assert!(entry.is_expired_at(entry.expires_at));
        assert!(entry.is_expired_at(Utc::now() + Duration::seconds(61)));
    }

    #[test]
    fn zero_ttl_is_already_expired() {
        let entry = CacheEntry::new("d6:schools", json!([]), 0, Source::Mock);
        assert!(entry.is_expired());
    }
}
