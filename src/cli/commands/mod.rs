//! CLI command implementations

pub mod cache;
pub mod call;
pub mod config;
pub mod probe;
pub mod status;
pub mod tools;

pub use cache::execute as cache;
pub use call::execute as call;
pub use config::execute as config;
pub use probe::execute as probe;
pub use status::execute as status;
pub use tools::execute as tools;

use crate::resolver::{Freshness, HybridResolver, Tier};

/// Probe first unless this request can never reach an upstream tier
pub(crate) async fn probe_if_needed(resolver: &HybridResolver, freshness: Freshness) {
    let plan = resolver.plan(freshness);
    if plan.contains(&Tier::UpstreamV2) || plan.contains(&Tier::UpstreamV1) {
        resolver.probe().await;
    }
}
