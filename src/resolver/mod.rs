//! Hybrid resolution engine
//!
//! Answers "give me resource X" from the first tier that can: cache, D6 v2,
//! D6 v1, then mock data. See [`HybridResolver`] for the tier walk.

mod hybrid;
mod request;
mod tier;

pub use hybrid::HybridResolver;
pub use request::{
    is_valid_lookup_type, MarkFilter, Page, ResourceKind, ResourceRequest, CACHE_NAMESPACE,
    DEFAULT_PAGE_LIMIT,
};
pub use tier::{Freshness, ResolvedResult, Source, Tier, TierAttempt, TierOutcome};
