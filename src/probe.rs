//! Availability probe
//!
//! Fetches a small lookup table from every configured API version and
//! publishes which ones answered. The probe never fails: every outcome,
//! including a panicked task, becomes a `ProbeOutcome`.

use crate::availability::{AvailabilityState, SharedAvailability};
use crate::resolver::ResourceRequest;
use crate::upstream::{ApiVersion, UpstreamCall, UpstreamClient};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Result of probing one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "kebab-case")]
pub enum ProbeOutcome {
    Available,
    /// The environment does not expose this version; not an error
    RouteNotFound,
    /// Timeout, 5xx or transport failure
    Failed(String),
    /// No credentials, so no request was made
    Unconfigured,
}

impl ProbeOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Available)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Available => write!(f, "available"),
            ProbeOutcome::RouteNotFound => write!(f, "not exposed"),
            ProbeOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            ProbeOutcome::Unconfigured => write!(f, "not configured"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionProbe {
    pub version: ApiVersion,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    pub elapsed_ms: u64,
}

/// Every version's outcome plus the state that was published
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub versions: Vec<VersionProbe>,
    pub state: AvailabilityState,
}

impl ProbeReport {
    pub fn outcome(&self, version: ApiVersion) -> Option<&ProbeOutcome> {
        self.versions
            .iter()
            .find(|p| p.version == version)
            .map(|p| &p.outcome)
    }
}

#[derive(Clone)]
pub struct AvailabilityProbe {
    clients: Vec<Arc<dyn UpstreamClient>>,
    call: UpstreamCall,
}

impl AvailabilityProbe {
    /// Probe `clients` with a fetch of the `lookup` table
    pub fn new(clients: Vec<Arc<dyn UpstreamClient>>, lookup: &str) -> Self {
        Self {
            clients,
            call: ResourceRequest::lookup(lookup).upstream_call(),
        }
    }

    /// Probe a single client
    pub async fn check(client: &dyn UpstreamClient, call: &UpstreamCall) -> ProbeOutcome {
        if !client.is_configured() {
            return ProbeOutcome::Unconfigured;
        }
        match client.get(call).await {
            Ok(_) => ProbeOutcome::Available,
            Err(e) if e.is_route_not_found() => ProbeOutcome::RouteNotFound,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }

    /// Probe all versions concurrently and publish both flags in one write
    pub async fn run(&self, shared: &SharedAvailability) -> ProbeReport {
        let handles: Vec<_> = self
            .clients
            .iter()
            .map(|client| {
                let client = Arc::clone(client);
                let call = self.call.clone();
                let version = client.version();
                let handle = tokio::spawn(async move {
                    let started = Instant::now();
                    let outcome = Self::check(client.as_ref(), &call).await;
                    (outcome, started.elapsed().as_millis() as u64)
                });
                (version, handle)
            })
            .collect();

        let mut versions = Vec::with_capacity(handles.len());
        for (version, handle) in handles {
            let (outcome, elapsed_ms) = match handle.await {
                Ok(result) => result,
                Err(e) => (ProbeOutcome::Failed(format!("probe task failed: {}", e)), 0),
            };

            match &outcome {
                ProbeOutcome::Available => info!("D6 {} available ({} ms)", version, elapsed_ms),
                ProbeOutcome::RouteNotFound => info!("D6 {} not exposed here", version),
                ProbeOutcome::Unconfigured => {
                    info!("D6 {} not probed: no credentials configured", version)
                }
                ProbeOutcome::Failed(reason) => {
                    warn!("D6 {} probe failed: {}", version, reason);
                    shared.record_error(reason).await;
                }
            }

            versions.push(VersionProbe {
                version,
                outcome,
                elapsed_ms,
            });
        }

        // A clean run means any earlier failure no longer describes the upstream
        let failed = versions
            .iter()
            .any(|p| matches!(p.outcome, ProbeOutcome::Failed(_)));
        if !failed {
            shared.clear_error().await;
        }

        let available = |v: ApiVersion| {
            versions
                .iter()
                .any(|p| p.version == v && p.outcome.is_available())
        };
        shared
            .set_versions(available(ApiVersion::V2), available(ApiVersion::V1))
            .await;

        ProbeReport {
            versions,
            state: shared.snapshot().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::ResolverMode;
    use crate::upstream::fake::{FakeUpstream, Script};
    use serde_json::json;

    fn probe(v2: &Arc<FakeUpstream>, v1: &Arc<FakeUpstream>) -> AvailabilityProbe {
        AvailabilityProbe::new(
            vec![
                v2.clone() as Arc<dyn UpstreamClient>,
                v1.clone() as Arc<dyn UpstreamClient>,
            ],
            "genders",
        )
    }

    #[tokio::test]
    async fn both_versions_available() {
        let v2 = FakeUpstream::new(ApiVersion::V2, Script::Respond(json!([])));
        let v1 = FakeUpstream::new(ApiVersion::V1, Script::Respond(json!([])));
        let shared = SharedAvailability::new(ResolverMode::Hybrid);

        let report = probe(&v2, &v1).run(&shared).await;

        assert!(report.state.v2_available && report.state.v1_available);
        assert_eq!(v2.paths(), vec!["/adminplus/lookup/genders".to_string()]);
        assert!(shared.last_error().await.is_none());
    }

    #[tokio::test]
    async fn route_not_found_is_not_an_error() {
        let v2 = FakeUpstream::new(ApiVersion::V2, Script::NotFound);
        let v1 = FakeUpstream::new(ApiVersion::V1, Script::Respond(json!([])));
        let shared = SharedAvailability::new(ResolverMode::Hybrid);

        let report = probe(&v2, &v1).run(&shared).await;

        assert_eq!(report.outcome(ApiVersion::V2), Some(&ProbeOutcome::RouteNotFound));
        assert!(!report.state.v2_available);
        assert!(report.state.v1_available);
        assert!(shared.last_error().await.is_none());
    }

    #[tokio::test]
    async fn failures_are_recorded() {
        let v2 = FakeUpstream::new(ApiVersion::V2, Script::ServerError(502));
        let v1 = FakeUpstream::new(ApiVersion::V1, Script::Timeout);
        let shared = SharedAvailability::new(ResolverMode::Production);

        let report = probe(&v2, &v1).run(&shared).await;

        assert!(!report.state.any_upstream());
        assert!(matches!(
            report.outcome(ApiVersion::V2),
            Some(ProbeOutcome::Failed(reason)) if reason.contains("502")
        ));
        assert!(shared.last_error().await.is_some());
    }

    #[tokio::test]
    async fn unconfigured_clients_are_not_called() {
        let v2 = FakeUpstream::unconfigured(ApiVersion::V2);
        let v1 = FakeUpstream::unconfigured(ApiVersion::V1);
        let shared = SharedAvailability::new(ResolverMode::Hybrid);

        let report = probe(&v2, &v1).run(&shared).await;

        assert_eq!(v2.calls() + v1.calls(), 0);
        assert_eq!(report.outcome(ApiVersion::V1), Some(&ProbeOutcome::Unconfigured));
        assert!(!report.state.any_upstream());
        assert!(shared.last_error().await.is_none());
    }

    #[tokio::test]
    async fn reprobe_clears_stale_flags() {
        let v2 = FakeUpstream::new(ApiVersion::V2, Script::Respond(json!([])));
        let v1 = FakeUpstream::new(ApiVersion::V1, Script::NotFound);
        let shared = SharedAvailability::new(ResolverMode::Hybrid);
        let probe = probe(&v2, &v1);

        assert!(probe.run(&shared).await.state.v2_available);
        v2.set_script(Script::Timeout);
        assert!(!probe.run(&shared).await.state.v2_available);
    }

    #[tokio::test]
    async fn clean_reprobe_clears_last_error() {
        let v2 = FakeUpstream::new(ApiVersion::V2, Script::Timeout);
        let v1 = FakeUpstream::new(ApiVersion::V1, Script::NotFound);
        let shared = SharedAvailability::new(ResolverMode::Hybrid);
        let probe = probe(&v2, &v1);

        probe.run(&shared).await;
        assert!(shared.last_error().await.unwrap().contains("timed out"));

        v2.set_script(Script::Respond(json!([])));
        let report = probe.run(&shared).await;
        assert!(report.state.v2_available);
        assert!(shared.last_error().await.is_none());
    }

    #[tokio::test]
    async fn unconfigured_reprobe_clears_last_error() {
        let v2 = FakeUpstream::unconfigured(ApiVersion::V2);
        let v1 = FakeUpstream::unconfigured(ApiVersion::V1);
        let shared = SharedAvailability::new(ResolverMode::Production);
        shared.record_error("D6 v2 timed out").await;

        probe(&v2, &v1).run(&shared).await;

        assert!(shared.last_error().await.is_none());
    }
}
