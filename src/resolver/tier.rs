//! Tier vocabulary shared by the resolver, cache and error types

use crate::error::BridgeResult;
use crate::upstream::ApiVersion;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "cache")]
    Cache,
    #[serde(rename = "upstream-v2")]
    UpstreamV2,
    #[serde(rename = "upstream-v1")]
    UpstreamV1,
    #[serde(rename = "mock")]
    Mock,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::UpstreamV2 => "upstream-v2",
            Source::UpstreamV1 => "upstream-v1",
            Source::Mock => "mock",
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Source::UpstreamV2 | Source::UpstreamV1)
    }
}

impl From<ApiVersion> for Source {
    fn from(version: ApiVersion) -> Self {
        match version {
            ApiVersion::V2 => Source::UpstreamV2,
            ApiVersion::V1 => Source::UpstreamV1,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate source in the resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Cache,
    UpstreamV2,
    UpstreamV1,
    Mock,
}

impl Tier {
    /// The source tag a tier stamps on data it serves
    pub fn source(&self) -> Source {
        match self {
            Tier::Cache => Source::Cache,
            Tier::UpstreamV2 => Source::UpstreamV2,
            Tier::UpstreamV1 => Source::UpstreamV1,
            Tier::Mock => Source::Mock,
        }
    }

    pub fn upstream(version: ApiVersion) -> Self {
        match version {
            ApiVersion::V2 => Tier::UpstreamV2,
            ApiVersion::V1 => Tier::UpstreamV1,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source().as_str())
    }
}

/// Result of asking one tier; expected misses are values, not errors
#[derive(Debug)]
pub enum TierOutcome {
    Served(Value),
    /// Tier was not attempted (disabled, unavailable, bypassed)
    Skipped(&'static str),
    /// Tier was attempted and could not serve
    Missed(String),
    /// Tier does not expose this route; falls through without counting as an error
    NotExposed(String),
}

/// What happened at one tier, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierAttempt {
    pub tier: Tier,
    pub note: String,
}

impl TierAttempt {
    pub fn new(tier: Tier, note: impl Into<String>) -> Self {
        Self {
            tier,
            note: note.into(),
        }
    }
}

impl fmt::Display for TierAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tier, self.note)
    }
}

/// Whether the caller accepts a cached answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Freshness {
    #[default]
    Cached,
    /// Bypass the cache tier; the result is still written back
    Live,
}

/// Data plus the tier that supplied it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedResult<T> {
    pub data: T,
    pub source: Source,
}

impl<T> ResolvedResult<T> {
    pub fn new(data: T, source: Source) -> Self {
        Self { data, source }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResolvedResult<U> {
        ResolvedResult {
            data: f(self.data),
            source: self.source,
        }
    }
}

impl ResolvedResult<Value> {
    /// Decode the JSON payload into a typed record set
    pub fn into_typed<U: DeserializeOwned>(self) -> BridgeResult<ResolvedResult<U>> {
        Ok(ResolvedResult {
            data: serde_json::from_value(self.data)?,
            source: self.source,
        })
    }
}
