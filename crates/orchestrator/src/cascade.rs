//! Fallback cascade policy for empty search results.

use serde_json::Value;

use radny_core::{ToolResult, EXHAUSTIVE_SEARCH};

/// Tools whose results are checked for emptiness.
pub const SEARCH_CLASS_TOOLS: &[&str] = &[
    "session_search",
    "rag_search",
    "person_search",
    "document_fetch",
    "budget_analysis",
    "youtube_search",
    "data_sources_search",
];

pub fn is_search_tool(name: &str) -> bool {
    SEARCH_CLASS_TOOLS.contains(&name)
}

/// Emptiness predicate over a tool's normalized `data`.
///
/// A result counts as empty iff none of `results`, `documents`,
/// `ragResults`, `videos` is a non-empty array and `totalFound` is not a
/// non-zero number. Missing data is empty.
pub fn is_empty_result(data: Option<&Value>) -> bool {
    let Some(data) = data else {
        return true;
    };

    let has_entries = ["results", "documents", "ragResults", "videos"]
        .iter()
        .any(|key| {
            data.get(key)
                .and_then(Value::as_array)
                .is_some_and(|arr| !arr.is_empty())
        });

    let total_found = data
        .get("totalFound")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    !has_entries && total_found == 0.0
}

/// Decide whether an exhaustive-search fallback should run after `result`.
///
/// Fires only for a successful, empty, search-class result, and only when
/// `exhaustive_search` was not in the originally submitted tool list. The
/// guard looks at the submitted list alone, so several empty search tools in
/// one dispatch each trigger their own attempt.
pub fn should_trigger(result: &ToolResult, submitted_tools: &[String]) -> bool {
    result.success
        && is_search_tool(&result.tool)
        && is_empty_result(result.data.as_ref())
        && !submitted_tools.iter().any(|t| t == EXHAUSTIVE_SEARCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_result(tool: &str, data: Value) -> ToolResult {
        let mut result = ToolResult::noop(tool);
        result.data = Some(data);
        result
    }

    #[test]
    fn test_empty_results_array_is_empty() {
        assert!(is_empty_result(Some(&json!({"results": []}))));
        assert!(is_empty_result(None));
        assert!(is_empty_result(Some(&json!({}))));
    }

    #[test]
    fn test_any_populated_field_is_non_empty() {
        assert!(!is_empty_result(Some(&json!({"results": [{"id": 1}]}))));
        assert!(!is_empty_result(Some(&json!({"documents": [{}]}))));
        assert!(!is_empty_result(Some(&json!({"ragResults": [{}]}))));
        assert!(!is_empty_result(Some(&json!({"videos": [{}]}))));
        assert!(!is_empty_result(Some(&json!({"totalFound": 3}))));
    }

    #[test]
    fn test_zero_total_found_is_empty() {
        assert!(is_empty_result(Some(&json!({"totalFound": 0, "results": []}))));
    }

    #[test]
    fn test_triggers_for_empty_search_tool() {
        let result = search_result("rag_search", json!({"results": []}));
        let submitted = vec!["rag_search".to_string()];
        assert!(should_trigger(&result, &submitted));
    }

    #[test]
    fn test_no_trigger_for_non_empty() {
        let result = search_result("rag_search", json!({"results": [{"id": 1}]}));
        let submitted = vec!["rag_search".to_string()];
        assert!(!should_trigger(&result, &submitted));
    }

    #[test]
    fn test_no_trigger_for_non_search_tool() {
        let result = search_result("calendar_add", json!({}));
        let submitted = vec!["calendar_add".to_string()];
        assert!(!should_trigger(&result, &submitted));
    }

    #[test]
    fn test_no_trigger_when_exhaustive_already_requested() {
        let result = search_result("rag_search", json!({"results": []}));
        let submitted = vec!["rag_search".to_string(), EXHAUSTIVE_SEARCH.to_string()];
        assert!(!should_trigger(&result, &submitted));
    }

    #[test]
    fn test_no_trigger_for_failed_tool() {
        let result = ToolResult::failure("rag_search", "timeout", 5);
        let submitted = vec!["rag_search".to_string()];
        assert!(!should_trigger(&result, &submitted));
    }
}
