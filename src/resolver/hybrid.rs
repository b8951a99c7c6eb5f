//! The hybrid resolver
//!
//! Walks an ordered tier plan (cache, v2, v1, mock) until one tier serves.
//! Unavailable tiers are skipped without a network round-trip; attempted
//! tiers that fail are recorded and the walk continues. Only exhaustion of
//! the whole plan surfaces as an error.

use super::request::{
    is_valid_lookup_type, MarkFilter, Page, ResourceKind, ResourceRequest, CACHE_NAMESPACE,
};
use super::tier::{Freshness, ResolvedResult, Tier, TierAttempt, TierOutcome};
use crate::availability::{AvailabilityState, ResolverMode, SharedAvailability};
use crate::cache::{create_store, CacheStats, ResolverCache, TtlPolicy};
use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::mock::MockDataProvider;
use crate::probe::{AvailabilityProbe, ProbeReport};
use crate::upstream::{create_clients, ApiVersion, UpstreamClient};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Resolution context shared by every caller in the process
pub struct HybridResolver {
    cache: ResolverCache,
    clients: Vec<Arc<dyn UpstreamClient>>,
    availability: SharedAvailability,
    mock: OnceLock<Arc<MockDataProvider>>,
    mode: ResolverMode,
    sandbox_applies_to_live: bool,
    probe_lookup: String,
}

impl HybridResolver {
    /// Assemble a resolver from parts; `clients` are in preference order
    pub fn new(config: &Config, cache: ResolverCache, clients: Vec<Arc<dyn UpstreamClient>>) -> Self {
        let mode = config.mode();
        Self {
            cache,
            clients,
            availability: SharedAvailability::new(mode),
            mock: OnceLock::new(),
            mode,
            sandbox_applies_to_live: config.resolver.sandbox_applies_to_live,
            probe_lookup: config.upstream.probe_lookup.clone(),
        }
    }

    /// Build the configured cache backend and HTTP clients
    ///
    /// Availability starts all-false; call [`spawn_probe`](Self::spawn_probe)
    /// or [`probe`](Self::probe) to populate it.
    pub async fn from_config(config: &Config) -> BridgeResult<Self> {
        let store = create_store(config).await?;
        let cache = ResolverCache::new(store, TtlPolicy::from_config(&config.cache));
        Ok(Self::new(config, cache, create_clients(config)))
    }

    fn prober(&self) -> AvailabilityProbe {
        AvailabilityProbe::new(self.clients.clone(), &self.probe_lookup)
    }

    /// Probe in the background; resolutions meanwhile see the previous state
    pub fn spawn_probe(&self) -> JoinHandle<ProbeReport> {
        let probe = self.prober();
        let shared = self.availability.clone();
        tokio::spawn(async move { probe.run(&shared).await })
    }

    /// Probe and wait for the result
    pub async fn probe(&self) -> ProbeReport {
        self.prober().run(&self.availability).await
    }

    pub fn availability(&self) -> &SharedAvailability {
        &self.availability
    }

    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub fn mode(&self) -> ResolverMode {
        self.mode
    }

    pub fn mock_enabled(&self) -> bool {
        self.mode.mock_enabled()
    }

    pub fn probe_lookup(&self) -> &str {
        &self.probe_lookup
    }

    /// Mock provider, generated on first use
    pub fn mock_provider(&self) -> Arc<MockDataProvider> {
        Arc::clone(
            self.mock
                .get_or_init(|| Arc::new(MockDataProvider::new())),
        )
    }

    /// Tier order for a request of the given freshness
    pub fn plan(&self, freshness: Freshness) -> Vec<Tier> {
        let sandbox_first = self.mode == ResolverMode::Sandbox
            && (freshness == Freshness::Cached || self.sandbox_applies_to_live);

        if sandbox_first {
            vec![Tier::Cache, Tier::Mock]
        } else {
            vec![Tier::Cache, Tier::UpstreamV2, Tier::UpstreamV1, Tier::Mock]
        }
    }

    /// Resolve a request through the tier plan
    pub async fn resolve(
        &self,
        request: &ResourceRequest,
        freshness: Freshness,
    ) -> BridgeResult<ResolvedResult<Value>> {
        let key = request.cache_key();
        let availability = self.availability.snapshot().await;
        let mut attempts = Vec::new();
        let mut last_error = None;

        for tier in self.plan(freshness) {
            let outcome = match tier {
                Tier::Cache => self.try_cache(&key, freshness).await,
                Tier::UpstreamV2 => self.try_upstream(ApiVersion::V2, request, &availability).await,
                Tier::UpstreamV1 => self.try_upstream(ApiVersion::V1, request, &availability).await,
                Tier::Mock => self.try_mock(request),
            };

            match outcome {
                TierOutcome::Served(data) => {
                    let source = tier.source();
                    if tier != Tier::Cache {
                        self.cache.store_value(&key, data.clone(), source).await;
                    }
                    info!("Resolved {} from {}", request, source);
                    return Ok(ResolvedResult::new(data, source));
                }
                TierOutcome::Skipped(reason) => {
                    debug!("Skipping {} for {}: {}", tier, request, reason);
                    attempts.push(TierAttempt::new(tier, reason));
                }
                TierOutcome::NotExposed(reason) => {
                    attempts.push(TierAttempt::new(tier, reason));
                }
                TierOutcome::Missed(reason) => {
                    if tier != Tier::Cache {
                        last_error = Some(reason.clone());
                    }
                    attempts.push(TierAttempt::new(tier, reason));
                }
            }
        }

        let last_error = match last_error {
            Some(e) => Some(e),
            None => self.availability.last_error().await,
        };
        Err(BridgeError::ExhaustedFallback {
            resource: request.to_string(),
            availability: self.availability.snapshot().await,
            last_error,
            attempts,
        })
    }

    async fn try_cache(&self, key: &str, freshness: Freshness) -> TierOutcome {
        if freshness == Freshness::Live {
            return TierOutcome::Skipped("live request");
        }
        match self.cache.lookup(key).await {
            Some(value) => TierOutcome::Served(value),
            None => TierOutcome::Missed("miss".to_string()),
        }
    }

    async fn try_upstream(
        &self,
        version: ApiVersion,
        request: &ResourceRequest,
        availability: &AvailabilityState,
    ) -> TierOutcome {
        let available = match version {
            ApiVersion::V2 => availability.v2_available,
            ApiVersion::V1 => availability.v1_available,
        };
        if !available {
            return TierOutcome::Skipped("unavailable");
        }
        let Some(client) = self.clients.iter().find(|c| c.version() == version) else {
            return TierOutcome::Skipped("no client");
        };

        match client.get(&request.upstream_call()).await {
            Ok(value) => TierOutcome::Served(value),
            Err(e) if e.is_route_not_found() => {
                debug!("{}", e);
                TierOutcome::NotExposed(e.to_string())
            }
            Err(e) => {
                warn!("{}; falling through", e);
                self.availability.record_error(&e).await;
                TierOutcome::Missed(e.to_string())
            }
        }
    }

    fn try_mock(&self, request: &ResourceRequest) -> TierOutcome {
        if !self.mock_enabled() {
            return TierOutcome::Skipped("disabled");
        }
        match self.mock_provider().resolve(request) {
            Ok(value) => TierOutcome::Served(value),
            Err(e) => TierOutcome::Missed(e.to_string()),
        }
    }

    pub async fn get_schools(&self) -> BridgeResult<ResolvedResult<Value>> {
        self.resolve(&ResourceRequest::Schools, Freshness::Cached)
            .await
    }

    pub async fn get_learners(
        &self,
        school_id: u32,
        page: Page,
    ) -> BridgeResult<ResolvedResult<Value>> {
        self.resolve(&ResourceRequest::Learners { school_id, page }, Freshness::Cached)
            .await
    }

    pub async fn get_staff(&self, school_id: u32) -> BridgeResult<ResolvedResult<Value>> {
        self.resolve(&ResourceRequest::Staff { school_id }, Freshness::Cached)
            .await
    }

    pub async fn get_parents(&self, school_id: u32) -> BridgeResult<ResolvedResult<Value>> {
        self.resolve(&ResourceRequest::Parents { school_id }, Freshness::Cached)
            .await
    }

    pub async fn get_learner_marks(
        &self,
        learner_id: u64,
        filter: MarkFilter,
    ) -> BridgeResult<ResolvedResult<Value>> {
        self.resolve(&ResourceRequest::Marks { learner_id, filter }, Freshness::Cached)
            .await
    }

    pub async fn get_lookup_data(&self, lookup_type: &str) -> BridgeResult<ResolvedResult<Value>> {
        if !is_valid_lookup_type(lookup_type) {
            return Err(BridgeError::InvalidRequest(format!(
                "invalid lookup type '{}'",
                lookup_type
            )));
        }
        self.resolve(&ResourceRequest::lookup(lookup_type), Freshness::Cached)
            .await
    }

    /// Drop cached entries of one kind
    pub async fn invalidate(&self, kind: ResourceKind) -> usize {
        self.cache.invalidate_prefix(&kind.cache_prefix()).await
    }

    /// Drop every cached resolution
    pub async fn invalidate_all(&self) -> usize {
        self.cache
            .invalidate_prefix(&format!("{}:", CACHE_NAMESPACE))
            .await
    }
}
