//! HTTP client for one D6 API version
//!
//! `ureq` is blocking, so each request runs on the blocking pool and the
//! async caller just awaits the join handle.

use super::client::{ApiVersion, UpstreamCall, UpstreamClient};
use crate::config::schema::UpstreamConfig;
use crate::error::{BridgeError, BridgeResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Header carrying the integration username
pub const USERNAME_HEADER: &str = "HTTP-X-USERNAME";
/// Header carrying the integration password
pub const PASSWORD_HEADER: &str = "HTTP-X-PASSWORD";

/// D6 client bound to a single version's base URL
pub struct HttpUpstreamClient {
    version: ApiVersion,
    base_url: String,
    username: String,
    password: String,
    agent: ureq::Agent,
}

impl HttpUpstreamClient {
    pub fn new(version: ApiVersion, config: &UpstreamConfig) -> Self {
        let segment = match version {
            ApiVersion::V1 => &config.v1_path,
            ApiVersion::V2 => &config.v2_path,
        };
        Self {
            version,
            base_url: join_url(&config.base_url, segment),
            username: config.username.clone(),
            password: config.password.clone(),
            agent: build_agent(config.timeout()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, call: &UpstreamCall) -> String {
        join_url(&self.base_url, &call.path)
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Join URL parts with exactly one slash between them
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map a ureq failure onto the resolver's error taxonomy
fn classify(version: ApiVersion, path: &str, err: ureq::Error) -> BridgeError {
    match err {
        ureq::Error::StatusCode(404) => BridgeError::RouteNotFound {
            version,
            path: path.to_string(),
        },
        ureq::Error::StatusCode(status) => BridgeError::UpstreamStatus {
            version,
            path: path.to_string(),
            status,
        },
        ureq::Error::Timeout(_) => BridgeError::UpstreamTimeout {
            version,
            path: path.to_string(),
        },
        other => BridgeError::UpstreamTransport {
            version,
            reason: other.to_string(),
        },
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    fn version(&self) -> ApiVersion {
        self.version
    }

    fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    async fn get(&self, call: &UpstreamCall) -> BridgeResult<Value> {
        let version = self.version;
        let url = self.url_for(call);
        let path = call.path.clone();
        let query = call.query.clone();
        let username = self.username.clone();
        let password = self.password.clone();
        let agent = self.agent.clone();

        debug!("GET {} ({})", call.display_path(), version);

        let body = tokio::task::spawn_blocking(move || {
            let mut request = agent
                .get(&url)
                .header(USERNAME_HEADER, &username)
                .header(PASSWORD_HEADER, &password)
                .header("Accept", "application/json");
            for (key, value) in &query {
                request = request.query(key, value);
            }

            let mut response = request.call().map_err(|e| classify(version, &path, e))?;
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| BridgeError::UpstreamBody {
                    version,
                    reason: e.to_string(),
                })
        })
        .await
        .map_err(|e| BridgeError::Internal(format!("upstream request task failed: {}", e)))??;

        serde_json::from_str(&body).map_err(|e| BridgeError::UpstreamBody {
            version,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UpstreamConfig {
        UpstreamConfig {
            base_url: "https://integrate.example.org/api/".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn base_url_per_version() {
        let v1 = HttpUpstreamClient::new(ApiVersion::V1, &config());
        let v2 = HttpUpstreamClient::new(ApiVersion::V2, &config());
        assert_eq!(v1.base_url(), "https://integrate.example.org/api/v1");
        assert_eq!(v2.base_url(), "https://integrate.example.org/api/v2");
        assert_eq!(
            v2.url_for(&UpstreamCall::new("/adminplus/lookup/genders")),
            "https://integrate.example.org/api/v2/adminplus/lookup/genders"
        );
    }

    #[test]
    fn configured_requires_both_credentials() {
        let mut cfg = config();
        assert!(HttpUpstreamClient::new(ApiVersion::V2, &cfg).is_configured());
        cfg.password.clear();
        assert!(!HttpUpstreamClient::new(ApiVersion::V2, &cfg).is_configured());
    }

    #[test]
    fn classify_statuses() {
        assert!(classify(ApiVersion::V2, "/x", ureq::Error::StatusCode(404)).is_route_not_found());
        let err = classify(ApiVersion::V1, "/x", ureq::Error::StatusCode(503));
        assert!(err.is_upstream_failure());
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_failure() {
        let cfg = UpstreamConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            timeout_secs: 2,
            ..config()
        };
        let client = HttpUpstreamClient::new(ApiVersion::V2, &cfg);
        let err = client
            .get(&UpstreamCall::new("/adminplus/lookup/genders"))
            .await
            .unwrap_err();
        assert!(err.is_upstream_failure(), "unexpected error: {err}");
    }
}
