//! Upstream client construction

use crate::config::Config;
use crate::upstream::client::{ApiVersion, UpstreamClient};
use crate::upstream::http::HttpUpstreamClient;
use std::sync::Arc;

/// Versions in preference order
pub const PREFERENCE: [ApiVersion; 2] = [ApiVersion::V2, ApiVersion::V1];

/// Build one client per version, most preferred first
pub fn create_clients(config: &Config) -> Vec<Arc<dyn UpstreamClient>> {
    PREFERENCE
        .iter()
        .map(|&version| {
            Arc::new(HttpUpstreamClient::new(version, &config.upstream)) as Arc<dyn UpstreamClient>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_in_preference_order() {
        let clients = create_clients(&Config::default());
        let versions: Vec<_> = clients.iter().map(|c| c.version()).collect();
        assert_eq!(versions, vec![ApiVersion::V2, ApiVersion::V1]);
    }

    #[test]
    fn default_config_is_unconfigured() {
        assert!(create_clients(&Config::default())
            .iter()
            .all(|c| !c.is_configured()));
    }
}
