use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::tool::ToolResult;

// =============================================================================
// Orchestration Types (Engine Output)
// =============================================================================

/// Citation record surfaced to the user alongside the synthesized answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Human-readable title.
    pub title: String,

    /// Link to the underlying document or page, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Source family, e.g. "internet", "dokument", "sesja", "wideo".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Source {
    pub fn new(title: impl Into<String>, url: Option<String>, kind: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url,
            kind: kind.into(),
        }
    }
}

/// The engine's single return value for one orchestration call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    /// Classified intent for the message.
    pub intent: Intent,

    /// Results in submission order, fallback entries appended last.
    pub tool_results: Vec<ToolResult>,

    /// Final user-facing answer.
    pub synthesized_response: String,

    /// Citations collected during synthesis.
    pub sources: Vec<Source>,

    /// Wall-clock duration of the whole call.
    pub total_time_ms: u64,

    /// One entry per failed tool.
    pub warnings: Vec<String>,
}

impl OrchestrationResult {
    /// Build the warnings list from failed tool results.
    ///
    /// The message template is user-facing and localized; the content
    /// contract (tool name + error text) is fixed.
    pub fn warnings_for(tool_results: &[ToolResult]) -> Vec<String> {
        tool_results
            .iter()
            .filter(|r| !r.success)
            .map(|r| {
                format!(
                    "Narzędzie {} napotkało błąd: {}",
                    r.tool,
                    r.error.as_deref().unwrap_or("nieznany błąd")
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_contract() {
        let results = vec![
            ToolResult::failure("a", "timeout", 10),
            ToolResult::noop("simple_answer"),
            ToolResult::failure("b", "403", 20),
        ];

        assert_eq!(
            OrchestrationResult::warnings_for(&results),
            vec![
                "Narzędzie a napotkało błąd: timeout",
                "Narzędzie b napotkało błąd: 403",
            ]
        );
    }

    #[test]
    fn test_source_serializes_type_field() {
        let source = Source::new("Uchwała XIV/120", None, "dokument");
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "dokument");
        assert!(json.get("url").is_none());
    }
}
