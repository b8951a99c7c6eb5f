//! Response cache sitting in front of every resolution
//!
//! # Layout
//!
//! | Piece | Role |
//! |-------|------|
//! | `CacheStore` | get/set/delete/delete-by-prefix contract with per-entry TTL |
//! | `MemoryCacheStore` | process-local backend |
//! | `FileCacheStore` | JSON files under the state dir, shared across invocations |
//! | `ResolverCache` | swallows store errors, applies the TTL policy, counts hits |
//!
//! Data from D6 is kept for `real_data_ttl_secs`; synthetic data only for
//! the shorter `mock_data_ttl_secs`, so upstream gets re-checked sooner.

pub mod file;
pub mod layer;
pub mod memory;
pub mod store;

pub use file::FileCacheStore;
pub use layer::{CacheStats, ResolverCache, TtlPolicy};
pub use memory::MemoryCacheStore;
pub use store::{CacheEntry, CacheStore};

use crate::config::{CacheBackend, Config};
use crate::error::BridgeResult;
use std::sync::Arc;

/// Build the store selected by `cache.backend`
pub async fn create_store(config: &Config) -> BridgeResult<Arc<dyn CacheStore>> {
    Ok(match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
        CacheBackend::File => Arc::new(FileCacheStore::new().await?),
    })
}
