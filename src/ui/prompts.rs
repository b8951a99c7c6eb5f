//! Confirmation prompt with a non-interactive fallback

use super::context::UiContext;
use crate::error::{BridgeError, BridgeResult};

/// Ask yes/no; `--yes` approves and non-interactive runs take `default`
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> BridgeResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| BridgeError::Internal(format!("prompt task failed: {}", e)))?
    .map_err(|e| BridgeError::io("reading confirmation", e))
}
