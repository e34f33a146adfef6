use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Tool Types
// =============================================================================

/// Sentinel intent meaning "answer directly, no tool call".
pub const SIMPLE_ANSWER: &str = "simple_answer";

/// Broad search tool used by the fallback cascade.
pub const EXHAUSTIVE_SEARCH: &str = "exhaustive_search";

/// Normalized outcome of one tool invocation.
///
/// Exactly one of two shapes: `success=true` with optional `data`/`message`,
/// or `success=false` with `error` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Name of the tool that produced this result.
    pub tool: String,

    /// Whether the tool execution was successful.
    pub success: bool,

    /// Normalized payload, if the tool returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// User-facing message lifted from the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Opaque UI directive passed through to the front end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_action: Option<Value>,

    /// Route the front end should navigate to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_target: Option<String>,

    /// Wall-clock duration of the handler call.
    pub execution_time_ms: u64,

    /// Error message, present iff `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a no-op success with no payload.
    ///
    /// Used for the `simple_answer` sentinel and unregistered tool names.
    pub fn noop(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            success: true,
            data: None,
            message: None,
            ui_action: None,
            navigation_target: None,
            execution_time_ms: 0,
            error: None,
        }
    }

    /// Create a failed result for a thrown handler error.
    pub fn failure(tool: impl Into<String>, error: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            tool: tool.into(),
            success: false,
            data: None,
            message: None,
            ui_action: None,
            navigation_target: None,
            execution_time_ms,
            error: Some(error.into()),
        }
    }

    /// Whether this result carries anything worth synthesizing over.
    pub fn has_payload(&self) -> bool {
        self.success && (self.data.is_some() || self.message.is_some())
    }
}
