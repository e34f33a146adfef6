use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Intent Types (Classifier Output)
// =============================================================================

/// Validated intent classification for a user message.
///
/// Always structurally complete: entity vectors default to empty, numeric
/// fields carry defaults, and `primary_intent` is never blank (the sentinel
/// `simple_answer` stands in for "no tool needed").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Tool name to run first, or the `simple_answer` sentinel.
    pub primary_intent: String,

    /// Additional tools to run after the primary, in order.
    #[serde(default)]
    pub secondary_intents: Vec<String>,

    /// Classifier confidence in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Entities extracted from the message.
    #[serde(default)]
    pub entities: IntentEntities,

    /// Whether the message calls for the exhaustive search path.
    #[serde(default)]
    pub requires_deep_search: bool,

    /// Rough time estimate shown to the user while tools run.
    #[serde(default = "default_estimated_time")]
    pub estimated_time_seconds: u32,

    /// One-line description of what the classifier understood.
    #[serde(default)]
    pub description: String,
}

/// Entities extracted during classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentEntities {
    #[serde(default)]
    pub person_names: Vec<String>,

    #[serde(default)]
    pub document_refs: Vec<String>,

    /// Council session numbers; always positive after sanitization.
    #[serde(default)]
    pub session_numbers: Vec<u32>,

    #[serde(default)]
    pub dates: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,
}

fn default_confidence() -> f64 {
    0.5
}

fn default_estimated_time() -> u32 {
    10
}

impl Intent {
    /// Fixed fallback intent substituted when classification fails.
    ///
    /// Routes to the broad document search so a degraded classifier still
    /// produces a useful answer.
    pub fn fallback() -> Self {
        Self {
            primary_intent: "rag_search".to_string(),
            secondary_intents: Vec::new(),
            confidence: 0.5,
            entities: IntentEntities::default(),
            requires_deep_search: false,
            estimated_time_seconds: 15,
            description: String::new(),
        }
    }

    /// Intent that bypasses all tools.
    pub fn simple_answer() -> Self {
        Self {
            primary_intent: super::tool::SIMPLE_ANSWER.to_string(),
            secondary_intents: Vec::new(),
            confidence: 1.0,
            entities: IntentEntities::default(),
            requires_deep_search: false,
            estimated_time_seconds: 5,
            description: String::new(),
        }
    }

    /// The full tool list in submission order: primary first, then secondaries.
    pub fn tool_list(&self) -> Vec<String> {
        let mut tools = Vec::with_capacity(1 + self.secondary_intents.len());
        tools.push(self.primary_intent.clone());
        tools.extend(self.secondary_intents.iter().cloned());
        tools
    }
}

/// Coerce raw session-number entries into positive integers.
///
/// Numeric strings are parsed; non-numeric, non-positive, and out-of-range
/// values are dropped. Order is preserved.
pub fn sanitize_session_numbers(raw: &[Value]) -> Vec<u32> {
    raw.iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .filter(|n| *n > 0)
        .filter_map(|n| u32::try_from(n).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_session_numbers() {
        let raw = vec![json!(14), json!("17"), json!("abc"), json!(-3), json!(0), json!("9")];
        assert_eq!(sanitize_session_numbers(&raw), vec![14, 17, 9]);
    }

    #[test]
    fn test_sanitize_ignores_non_scalar() {
        let raw = vec![json!(null), json!([1, 2]), json!({"n": 5}), json!(3.5), json!(7)];
        assert_eq!(sanitize_session_numbers(&raw), vec![7]);
    }

    #[test]
    fn test_sanitize_drops_out_of_range_values() {
        let raw = vec![json!(4_294_967_297_i64), json!("4294967297"), json!(12)];
        assert_eq!(sanitize_session_numbers(&raw), vec![12]);
    }

    #[test]
    fn test_intent_deserializes_with_defaults() {
        let intent: Intent = serde_json::from_str(r#"{"primaryIntent": "session_search"}"#).unwrap();

        assert_eq!(intent.primary_intent, "session_search");
        assert!(intent.secondary_intents.is_empty());
        assert_eq!(intent.confidence, 0.5);
        assert!(intent.entities.session_numbers.is_empty());
        assert!(!intent.requires_deep_search);
    }

    #[test]
    fn test_tool_list_order() {
        let mut intent = Intent::fallback();
        intent.secondary_intents = vec!["youtube_search".into(), "rag_search".into()];

        assert_eq!(
            intent.tool_list(),
            vec!["rag_search", "youtube_search", "rag_search"]
        );
    }
}
