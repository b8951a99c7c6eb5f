//! Upstream availability state shared between the probe and the resolver
//!
//! The probe is the only writer. Readers always see a whole snapshot: both
//! flags are replaced in a single write, so a resolver running during an
//! in-flight probe simply sees the previous (conservative) state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// How the resolver orders its tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Upstream only; mock data disabled
    Production,
    /// Mock data ahead of upstream
    Sandbox,
    /// Upstream first, mock data as the last resort
    Hybrid,
}

impl ResolverMode {
    /// Derive the mode from the two configuration flags
    pub fn from_flags(enable_mock_data: bool, use_mock_data_first: bool) -> Self {
        if use_mock_data_first {
            Self::Sandbox
        } else if enable_mock_data {
            Self::Hybrid
        } else {
            Self::Production
        }
    }

    /// Whether the mock tier may serve requests at all
    pub fn mock_enabled(&self) -> bool {
        !matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of which upstream versions answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityState {
    pub v1_available: bool,
    pub v2_available: bool,
    pub mode: ResolverMode,
}

impl AvailabilityState {
    /// Initial state: nothing is known to be reachable
    pub fn unprobed(mode: ResolverMode) -> Self {
        Self {
            v1_available: false,
            v2_available: false,
            mode,
        }
    }

    /// At least one upstream version answered the last probe
    pub fn any_upstream(&self) -> bool {
        self.v1_available || self.v2_available
    }
}

/// Availability plus the last concrete upstream error, shared by reference
#[derive(Debug, Clone)]
pub struct SharedAvailability {
    state: Arc<RwLock<AvailabilityState>>,
    last_error: Arc<RwLock<Option<String>>>,
}

impl SharedAvailability {
    pub fn new(mode: ResolverMode) -> Self {
        Self {
            state: Arc::new(RwLock::new(AvailabilityState::unprobed(mode))),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> AvailabilityState {
        *self.state.read().await
    }

    /// Replace both version flags at once
    pub async fn set_versions(&self, v2_available: bool, v1_available: bool) {
        let mut state = self.state.write().await;
        state.v2_available = v2_available;
        state.v1_available = v1_available;
    }

    pub async fn record_error(&self, error: impl fmt::Display) {
        *self.last_error.write().await = Some(error.to_string());
    }

    pub async fn clear_error(&self) {
        *self.last_error.write().await = None;
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_flags() {
        assert_eq!(ResolverMode::from_flags(false, false), ResolverMode::Production);
        assert_eq!(ResolverMode::from_flags(true, false), ResolverMode::Hybrid);
        assert_eq!(ResolverMode::from_flags(true, true), ResolverMode::Sandbox);
        // Sandbox implies mock data even when the enable flag is off
        assert_eq!(ResolverMode::from_flags(false, true), ResolverMode::Sandbox);
        assert!(ResolverMode::Sandbox.mock_enabled());
        assert!(!ResolverMode::Production.mock_enabled());
    }

    #[test]
    fn state_serializes_camel_case() {
        let state = AvailabilityState::unprobed(ResolverMode::Hybrid);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["v1Available"], false);
        assert_eq!(json["v2Available"], false);
        assert_eq!(json["mode"], "hybrid");
    }

    #[tokio::test]
    async fn shared_starts_unprobed() {
        let shared = SharedAvailability::new(ResolverMode::Production);
        let snap = shared.snapshot().await;
        assert!(!snap.any_upstream());
        assert!(shared.last_error().await.is_none());
    }

    #[tokio::test]
    async fn set_versions_and_record_error() {
        let shared = SharedAvailability::new(ResolverMode::Hybrid);
        shared.set_versions(false, true).await;
        shared.record_error("D6 v2 timed out").await;

        let snap = shared.snapshot().await;
        assert!(!snap.v2_available);
        assert!(snap.v1_available);
        assert_eq!(shared.last_error().await.as_deref(), Some("D6 v2 timed out"));

        shared.clear_error().await;
        assert!(shared.last_error().await.is_none());
    }
}
