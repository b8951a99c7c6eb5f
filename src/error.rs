//! Error types for d6bridge
//!
//! All modules use `BridgeResult<T>` as their return type. Only
//! `ExhaustedFallback` is meant to reach a tool caller; every upstream and
//! cache error is recovered inside the resolver by moving to the next tier.

use crate::availability::AvailabilityState;
use crate::resolver::TierAttempt;
use crate::upstream::ApiVersion;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for d6bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// All errors that can occur in d6bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    // Upstream errors
    #[error("D6 {version} has no route for {path}")]
    RouteNotFound { version: ApiVersion, path: String },

    #[error("D6 {version} returned HTTP {status} for {path}")]
    UpstreamStatus {
        version: ApiVersion,
        path: String,
        status: u16,
    },

    #[error("D6 {version} timed out on {path}")]
    UpstreamTimeout { version: ApiVersion, path: String },

    #[error("D6 {version} unreachable: {reason}")]
    UpstreamTransport { version: ApiVersion, reason: String },

    #[error("D6 {version} returned an unreadable body: {reason}")]
    UpstreamBody { version: ApiVersion, reason: String },

    // Resolution errors
    #[error(
        "No source could serve {resource} (v2 {v2}, v1 {v1}, mock {mock}){last}; attempted: {tried}",
        v2 = availability_word(.availability.v2_available),
        v1 = availability_word(.availability.v1_available),
        mock = mock_word(.availability),
        last = last_error_suffix(.last_error),
        tried = describe_attempts(.attempts),
    )]
    ExhaustedFallback {
        resource: String,
        availability: AvailabilityState,
        last_error: Option<String>,
        attempts: Vec<TierAttempt>,
    },

    // Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    // Tool call errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn availability_word(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable"
    }
}

fn mock_word(availability: &AvailabilityState) -> &'static str {
    if availability.mode.mock_enabled() {
        "enabled"
    } else {
        "disabled"
    }
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!("; last error: {}", e),
        None => String::new(),
    }
}

fn describe_attempts(attempts: &[TierAttempt]) -> String {
    if attempts.is_empty() {
        return "nothing".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl BridgeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid-config error that is not tied to a file
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: PathBuf::from("<environment>"),
            reason: reason.into(),
        }
    }

    /// The upstream does not expose this route (expected for some versions)
    pub fn is_route_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }

    /// Timeouts, 5xx, transport and decoding failures
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. }
                | Self::UpstreamTimeout { .. }
                | Self::UpstreamTransport { .. }
                | Self::UpstreamBody { .. }
        )
    }

    /// No tier could serve the request
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::ExhaustedFallback { .. })
    }

    /// True when resolution failed without any upstream tier being reachable
    /// or reporting an error, i.e. nothing was ever configured to answer.
    pub fn is_unconfigured(&self) -> bool {
        match self {
            Self::ExhaustedFallback {
                availability,
                last_error,
                ..
            } => !availability.any_upstream() && last_error.is_none(),
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            e if e.is_unconfigured() => {
                Some("Set D6_API_USERNAME and D6_API_PASSWORD, or enable mock data")
            }
            Self::ExhaustedFallback { .. } => {
                Some("D6 looks degraded; retry later or run: d6bridge status")
            }
            Self::UnknownTool(_) => Some("Run: d6bridge tools"),
            Self::ConfigInvalid { .. } => Some("Run: d6bridge config show"),
            _ => None,
        }
    }
}
