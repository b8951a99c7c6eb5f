//! Upstream client abstraction
//!
//! Both D6 API versions share one shape and differ only in base path, so
//! they implement the same trait and the resolver treats them as tiers.

use crate::error::BridgeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// D6 API surface version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GET request relative to a version's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCall {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl UpstreamCall {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Path plus query string, for logs
    pub fn display_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// One version of the D6 API
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Which API surface this client is bound to
    fn version(&self) -> ApiVersion;

    /// Whether credentials are present; unconfigured clients are never called
    fn is_configured(&self) -> bool;

    /// Issue a GET and decode the JSON body
    async fn get(&self, call: &UpstreamCall) -> BridgeResult<Value>;
}
