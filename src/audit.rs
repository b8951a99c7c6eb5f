//! Call log for served tool calls
//!
//! Writes JSON lines to `<state_dir>/calls.log`. Logging failures are
//! reported through tracing and never affect the call being logged.

use crate::config::{schema::Config, ConfigManager};
use crate::error::BridgeResult;
use crate::resolver::ResolvedResult;
use crate::tools::ToolName;
use chrono::Utc;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

/// Append-only JSON-lines log of tool calls
pub struct CallLog {
    enabled: bool,
    path: PathBuf,
}

impl CallLog {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.general.audit_log,
            path: ConfigManager::audit_log_path(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Record the outcome of one call; returns the generated call id
    pub async fn record(
        &self,
        tool: ToolName,
        outcome: &BridgeResult<ResolvedResult<Value>>,
        elapsed: Duration,
    ) -> Uuid {
        let call_id = Uuid::new_v4();
        if !self.enabled {
            return call_id;
        }

        let mut entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "call_id": call_id.to_string(),
            "tool": tool.as_str(),
            "duration_ms": elapsed.as_millis() as u64,
        });
        match outcome {
            Ok(result) => entry["source"] = json!(result.source),
            Err(e) => entry["error"] = json!(e.to_string()),
        }

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize call log entry: {}", e);
                return call_id;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write call log {}: {}", self.path.display(), e);
        }
        call_id
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
