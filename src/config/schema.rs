//! Configuration schema for d6bridge
//!
//! Configuration is stored at `~/.config/d6bridge/config.toml`

use crate::availability::ResolverMode;
use crate::error::{BridgeError, BridgeResult};
use crate::resolver::is_valid_lookup_type;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// D6 API connection
    pub upstream: UpstreamConfig,

    /// Tier selection
    pub resolver: ResolverConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Record served tool calls to the call log
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// D6 API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL without the version segment
    pub base_url: String,

    /// Value of the HTTP-X-USERNAME header
    pub username: String,

    /// Value of the HTTP-X-PASSWORD header
    pub password: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Path segment of the v1 surface
    pub v1_path: String,

    /// Path segment of the v2 surface
    pub v2_path: String,

    /// Lookup table fetched by the availability probe
    pub probe_lookup: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.d6plus.co.za/api".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 10,
            v1_path: "v1".to_string(),
            v2_path: "v2".to_string(),
            probe_lookup: "genders".to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Tier selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Allow the mock tier to serve when upstream cannot
    pub enable_mock_data: bool,

    /// Sandbox mode: serve mock data ahead of upstream
    pub use_mock_data_first: bool,

    /// Whether sandbox mode also applies to requests that skip the cache
    pub sandbox_applies_to_live: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enable_mock_data: true,
            use_mock_data_first: false,
            sandbox_applies_to_live: true,
        }
    }
}

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map
    Memory,
    /// JSON files under the state directory
    File,
}

impl std::str::FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// TTL for data served by D6 (changes slowly)
    pub real_data_ttl_secs: u64,

    /// TTL for synthetic data, so upstream is retried sooner
    pub mock_data_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            real_data_ttl_secs: 3600,
            mock_data_ttl_secs: 300,
        }
    }
}

impl Config {
    /// Resolver mode implied by the resolver flags
    pub fn mode(&self) -> ResolverMode {
        ResolverMode::from_flags(
            self.resolver.enable_mock_data,
            self.resolver.use_mock_data_first,
        )
    }

    /// Both credential headers are set
    pub fn has_credentials(&self) -> bool {
        !self.upstream.username.is_empty() && !self.upstream.password.is_empty()
    }

    /// Apply `D6_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> BridgeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("D6_API_BASE_URL") {
            self.upstream.base_url = v;
        }
        if let Some(v) = lookup("D6_API_USERNAME") {
            self.upstream.username = v;
        }
        if let Some(v) = lookup("D6_API_PASSWORD") {
            self.upstream.password = v;
        }
        if let Some(v) = lookup("D6_REQUEST_TIMEOUT_SECS") {
            self.upstream.timeout_secs = v.trim().parse().map_err(|_| {
                BridgeError::config(format!("D6_REQUEST_TIMEOUT_SECS is not a number: {}", v))
            })?;
        }
        if let Some(v) = lookup("D6_ENABLE_MOCK_DATA") {
            self.resolver.enable_mock_data = parse_flag("D6_ENABLE_MOCK_DATA", &v)?;
        }
        if let Some(v) = lookup("D6_USE_MOCK_DATA_FIRST") {
            self.resolver.use_mock_data_first = parse_flag("D6_USE_MOCK_DATA_FIRST", &v)?;
        }
        if let Some(v) = lookup("D6_CACHE_BACKEND") {
            self.cache.backend = v
                .parse()
                .map_err(|e| BridgeError::config(format!("D6_CACHE_BACKEND: {}", e)))?;
        }
        Ok(())
    }

    /// Reject settings the resolver cannot work with
    pub fn validate(&self) -> BridgeResult<()> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(BridgeError::config("upstream.base_url must not be empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(BridgeError::config("upstream.timeout_secs must be positive"));
        }
        if !is_valid_lookup_type(&self.upstream.probe_lookup) {
            return Err(BridgeError::config(format!(
                "upstream.probe_lookup is not a lookup type: {}",
                self.upstream.probe_lookup
            )));
        }
        if self.cache.mock_data_ttl_secs >= self.cache.real_data_ttl_secs {
            return Err(BridgeError::config(format!(
                "cache.mock_data_ttl_secs ({}) must be shorter than cache.real_data_ttl_secs ({})",
                self.cache.mock_data_ttl_secs, self.cache.real_data_ttl_secs
            )));
        }
        Ok(())
    }
}

/// Parse a boolean flag value from the environment
pub fn parse_flag(name: &str, value: &str) -> BridgeResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(BridgeError::config(format!(
            "{} is not a boolean: {}",
            name, other
        ))),
    }
}
