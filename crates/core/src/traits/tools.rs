//! Tool handler interface.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::Intent;

/// One registered backend capability, invoked by name from the dispatcher.
///
/// Handlers may return any JSON shape: an object carrying `data`/`message`/
/// `uiAction`/`navigationTarget` fields gets envelope extraction, anything
/// else is passed through as opaque `data`. A returned `Err` is isolated to
/// this tool's result and never aborts the batch.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique tool name the dispatcher routes on.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Execute the tool against the raw user message and classified intent.
    async fn execute(&self, message: &str, intent: &Intent) -> Result<Value>;
}
