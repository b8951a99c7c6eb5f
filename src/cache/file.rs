//! File-backed cache, one JSON document per key
//!
//! Survives across CLI invocations. Corrupt or unreadable files read as a
//! miss and are removed on the next write or clear.

use super::store::{CacheEntry, CacheStore};
use crate::config::ConfigManager;
use crate::error::{BridgeError, BridgeResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Cache store rooted at a directory
pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    /// Create a store under the default state directory
    pub async fn new() -> BridgeResult<Self> {
        Self::with_dir(ConfigManager::cache_dir()).await
    }

    /// Create a store under an explicit directory
    pub async fn with_dir(cache_dir: PathBuf) -> BridgeResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| BridgeError::io(format!("creating cache dir {}", cache_dir.display()), e))?;

        // Cached payloads may contain learner records
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&cache_dir, perms)
                .map_err(|e| BridgeError::io("setting cache dir permissions", e))?;
        }

        Ok(Self { cache_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", encode_key(key)))
    }

    /// Keys of every stored entry, decoded from the file names
    async fn stored_keys(&self) -> BridgeResult<Vec<(String, PathBuf)>> {
        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| BridgeError::io("reading cache directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BridgeError::io("reading cache entry", e))?
        {
            let path = entry.path();
            let decoded = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(decode_key);
            if let Some(key) = decoded {
                keys.push((key, path));
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get_entry(&self, key: &str) -> BridgeResult<Option<CacheEntry>> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| BridgeError::io(format!("reading cache file {}", path.display()), e))?;

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Ignoring corrupt cache file {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        if entry.is_expired() {
            debug!("Cache entry {} is expired", key);
            self.delete(key).await?;
            return Ok(None);
        }

        Ok(Some(entry))
    }

    async fn put(&self, entry: CacheEntry) -> BridgeResult<()> {
        let path = self.entry_path(&entry.key);
        let content = serde_json::to_string(&entry)?;

        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| BridgeError::io(format!("writing cache file {}", tmp.display()), e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| BridgeError::io(format!("replacing cache file {}", path.display()), e))?;

        debug!("Cached {} until {}", entry.key, entry.expires_at);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BridgeResult<bool> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).await.map_err(|e| {
            BridgeError::io(format!("removing cache file {}", path.display()), e)
        })?;
        Ok(true)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> BridgeResult<usize> {
        let mut removed = 0;
        for (key, path) in self.stored_keys().await? {
            if key.starts_with(prefix) {
                fs::remove_file(&path)
                    .await
                    .map_err(|e| BridgeError::io("removing cache file", e))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn len(&self) -> BridgeResult<usize> {
        Ok(self.stored_keys().await?.len())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Escape a cache key into a portable file stem (`%XX` for unsafe bytes)
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'=' | b'.') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

fn decode_key(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
