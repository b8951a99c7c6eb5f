//! Scripted upstream for resolver and probe tests

use super::client::{ApiVersion, UpstreamCall, UpstreamClient};
use crate::error::{BridgeError, BridgeResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What every call to the fake returns
#[derive(Debug, Clone)]
pub enum Script {
    Respond(Value),
    NotFound,
    ServerError(u16),
    Timeout,
}

pub struct FakeUpstream {
    version: ApiVersion,
    configured: bool,
    script: Mutex<Script>,
    calls: AtomicUsize,
    paths: Mutex<Vec<String>>,
}

impl FakeUpstream {
    pub fn new(version: ApiVersion, script: Script) -> Arc<Self> {
        Arc::new(Self {
            version,
            configured: true,
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured(version: ApiVersion) -> Arc<Self> {
        Arc::new(Self {
            version,
            configured: false,
            script: Mutex::new(Script::Timeout),
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
        })
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    fn version(&self) -> ApiVersion {
        self.version
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn get(&self, call: &UpstreamCall) -> BridgeResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(call.display_path());

        let script = self.script.lock().unwrap().clone();
        match script {
            Script::Respond(value) => Ok(value),
            Script::NotFound => Err(BridgeError::RouteNotFound {
                version: self.version,
                path: call.path.clone(),
            }),
            Script::ServerError(status) => Err(BridgeError::UpstreamStatus {
                version: self.version,
                path: call.path.clone(),
                status,
            }),
            Script::Timeout => Err(BridgeError::UpstreamTimeout {
                version: self.version,
                path: call.path.clone(),
            }),
        }
    }
}
