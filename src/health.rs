//! Health reporting
//!
//! A snapshot is derived on demand from the shared availability state, the
//! cache counters, and one timed resolution. Nothing is retained between
//! calls, so polling is always safe.

use crate::availability::AvailabilityState;
use crate::cache::CacheStats;
use crate::resolver::{Freshness, HybridResolver, ResourceRequest, Source};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Overall service health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// At least one D6 version answers
    Healthy,
    /// Only mock data can be served
    Degraded,
    /// Nothing can be served
    Unhealthy,
}

impl HealthStatus {
    pub fn derive(availability: &AvailabilityState, mock_data_available: bool) -> Self {
        if availability.any_upstream() {
            HealthStatus::Healthy
        } else if mock_data_available {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub availability: AvailabilityState,
    /// Duration of the timed lookup, whichever tier served it
    pub response_time_ms: u64,
    pub mock_data_available: bool,
    pub cache: CacheStats,
    pub last_error: Option<String>,
    /// Tier that served the timed lookup; `None` when it failed
    pub probe_source: Option<Source>,
    pub timestamp: DateTime<Utc>,
}

/// Builds snapshots for one resolver
pub struct HealthReporter<'a> {
    resolver: &'a HybridResolver,
}

impl<'a> HealthReporter<'a> {
    pub fn new(resolver: &'a HybridResolver) -> Self {
        Self { resolver }
    }

    pub async fn check(&self) -> HealthSnapshot {
        let request = ResourceRequest::lookup(self.resolver.probe_lookup());

        let started = Instant::now();
        let outcome = self.resolver.resolve(&request, Freshness::Live).await;
        let response_time_ms = started.elapsed().as_millis() as u64;

        let (probe_source, call_error) = match outcome {
            Ok(result) => (Some(result.source), None),
            Err(e) => (None, Some(e.to_string())),
        };

        let availability = self.resolver.availability().snapshot().await;
        let mock_data_available = self.resolver.mock_enabled();
        let last_error = match self.resolver.availability().last_error().await {
            Some(e) => Some(e),
            None => call_error,
        };

        HealthSnapshot {
            status: HealthStatus::derive(&availability, mock_data_available),
            availability,
            response_time_ms,
            mock_data_available,
            cache: self.resolver.cache_stats().await,
            last_error,
            probe_source,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::ResolverMode;
    use crate::cache::{MemoryCacheStore, ResolverCache, TtlPolicy};
    use crate::config::Config;
    use crate::upstream::fake::{FakeUpstream, Script};
    use crate::upstream::{ApiVersion, UpstreamClient};
    use serde_json::json;
    use std::sync::Arc;

    fn resolver(enable_mock: bool, v2: Script, v1: Script) -> HybridResolver {
        let mut config = Config::default();
        config.resolver.enable_mock_data = enable_mock;
        let cache = ResolverCache::new(Arc::new(MemoryCacheStore::new()), TtlPolicy::default());
        HybridResolver::new(
            &config,
            cache,
            vec![
                FakeUpstream::new(ApiVersion::V2, v2) as Arc<dyn UpstreamClient>,
                FakeUpstream::new(ApiVersion::V1, v1) as Arc<dyn UpstreamClient>,
            ],
        )
    }

    #[test]
    fn status_derivation() {
        let mut state = AvailabilityState::unprobed(ResolverMode::Hybrid);
        assert_eq!(HealthStatus::derive(&state, true), HealthStatus::Degraded);
        assert_eq!(HealthStatus::derive(&state, false), HealthStatus::Unhealthy);
        state.v1_available = true;
        assert_eq!(HealthStatus::derive(&state, false), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn degraded_with_mock_only() {
        let r = resolver(true, Script::Timeout, Script::Timeout);

        let snapshot = HealthReporter::new(&r).check().await;

        assert_eq!(snapshot.status, HealthStatus::Degraded);
        assert!(snapshot.mock_data_available);
        assert_eq!(snapshot.probe_source, Some(Source::Mock));
    }

    #[tokio::test]
    async fn healthy_after_probe() {
        let r = resolver(false, Script::Respond(json!([])), Script::NotFound);
        r.probe().await;

        let snapshot = HealthReporter::new(&r).check().await;

        assert_eq!(snapshot.status, HealthStatus::Healthy);
        assert_eq!(snapshot.probe_source, Some(Source::UpstreamV2));
        assert!(snapshot.availability.v2_available);
    }

    #[tokio::test]
    async fn unhealthy_reports_error() {
        let r = resolver(false, Script::ServerError(503), Script::NotFound);
        r.probe().await;

        let snapshot = HealthReporter::new(&r).check().await;

        assert_eq!(snapshot.status, HealthStatus::Unhealthy);
        assert!(snapshot.probe_source.is_none());
        assert!(snapshot.last_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn snapshot_serializes_camel_case() {
        let r = resolver(true, Script::Timeout, Script::Timeout);
        let json = serde_json::to_value(HealthReporter::new(&r).check().await).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["mockDataAvailable"], true);
        assert!(json["responseTimeMs"].is_u64());
        assert_eq!(json["cache"]["backend"], "memory");
    }
}
