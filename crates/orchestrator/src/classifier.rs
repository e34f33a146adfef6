//! Intent classifier adapter.
//!
//! Wraps one structured-output completion call and always hands back a
//! validated [`Intent`]. A malformed response or a failed call degrades to a
//! fixed fallback intent; the caller never sees an error from this module.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use radny_core::{sanitize_session_numbers, CompletionClient, Intent, IntentEntities, SIMPLE_ANSWER};

const CLASSIFIER_SYSTEM_PROMPT: &str = r#"Jesteś klasyfikatorem zapytań asystenta radnego. Przypisz pytanie użytkownika do narzędzi.

Dostępne narzędzia:
- session_search: sesje rady, porządki obrad, protokoły, głosowania
- rag_search: wyszukiwanie w lokalnych dokumentach gminy
- person_search: osoby publiczne, radni, urzędnicy
- document_fetch: pobranie konkretnego dokumentu lub uchwały
- budget_analysis: budżet gminy, wydatki, dochody
- youtube_search: nagrania i transkrypcje sesji
- data_sources_search: rejestry (KRS, CEIDG), dane GUS, geoportal, akty prawne
- exhaustive_search: szerokie wyszukiwanie po wszystkich źródłach
- calendar_add, calendar_list, calendar_edit, calendar_delete: kalendarz
- task_add, task_list, task_complete, task_delete: zadania
- alert_check, quick_tool, app_navigate: akcje aplikacji
- simple_answer: odpowiedz wprost, bez narzędzi

Odpowiedz wyłącznie obiektem JSON:
{
  "primaryIntent": "nazwa narzędzia",
  "secondaryIntents": [],
  "confidence": 0.0-1.0,
  "entities": {
    "personNames": [],
    "documentRefs": [],
    "sessionNumbers": [],
    "dates": [],
    "topics": []
  },
  "requiresDeepSearch": false,
  "estimatedTimeSeconds": 10,
  "description": "krótki opis"
}"#;

/// Lenient wire shape for the classifier response.
///
/// Everything is optional; validation and defaulting happen in
/// [`RawIntent::into_intent`]. Session numbers arrive as raw JSON values
/// because models mix integers and numeric strings freely.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawIntent {
    primary_intent: Option<String>,
    secondary_intents: Vec<String>,
    confidence: Option<f64>,
    entities: RawEntities,
    requires_deep_search: bool,
    estimated_time_seconds: Option<u32>,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawEntities {
    person_names: Vec<String>,
    document_refs: Vec<String>,
    session_numbers: Vec<Value>,
    dates: Vec<String>,
    topics: Vec<String>,
}

impl RawIntent {
    fn into_intent(self) -> Intent {
        let primary_intent = match self.primary_intent {
            Some(name) if !name.trim().is_empty() => name,
            _ => SIMPLE_ANSWER.to_string(),
        };

        Intent {
            primary_intent,
            secondary_intents: self.secondary_intents,
            confidence: self.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
            entities: IntentEntities {
                person_names: self.entities.person_names,
                document_refs: self.entities.document_refs,
                session_numbers: sanitize_session_numbers(&self.entities.session_numbers),
                dates: self.entities.dates,
                topics: self.entities.topics,
            },
            requires_deep_search: self.requires_deep_search,
            estimated_time_seconds: self.estimated_time_seconds.unwrap_or(10),
            description: self.description,
        }
    }
}

/// Intent classifier over a completion client.
pub struct IntentClassifier {
    llm: Arc<dyn CompletionClient>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// Classify a user message, optionally with prior-turn context.
    ///
    /// Never fails: a completion error or unparseable response yields
    /// [`Intent::fallback`].
    pub async fn detect_intent(&self, message: &str, context: Option<&str>) -> Intent {
        let user_prompt = match context {
            Some(ctx) if !ctx.trim().is_empty() => {
                format!("Kontekst rozmowy:\n{}\n\nPytanie: {}", ctx, message)
            }
            _ => message.to_string(),
        };

        let raw = match self.llm.complete(CLASSIFIER_SYSTEM_PROMPT, &user_prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Intent classification call failed, using fallback intent");
                return Intent::fallback();
            }
        };

        match parse_intent(&raw) {
            Some(intent) => {
                tracing::debug!(
                    primary = %intent.primary_intent,
                    secondary_count = intent.secondary_intents.len(),
                    confidence = intent.confidence,
                    "Intent classified"
                );
                intent
            }
            None => {
                tracing::warn!(
                    response_len = raw.len(),
                    "Unparseable classifier response, using fallback intent"
                );
                Intent::fallback()
            }
        }
    }
}

fn parse_intent(raw: &str) -> Option<Intent> {
    let stripped = strip_code_fences(raw);
    let payload: RawIntent = serde_json::from_str(stripped).ok()?;
    Some(payload.into_intent())
}

/// Strip surrounding Markdown code fences from a model response.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use radny_core::mocks::{FailingCompletion, MockCompletion};

    #[tokio::test]
    async fn test_parses_valid_response() {
        let response = r#"{
            "primaryIntent": "session_search",
            "secondaryIntents": ["youtube_search"],
            "confidence": 0.9,
            "entities": {"sessionNumbers": [14, "17", "abc", -3, 0, "9"]},
            "requiresDeepSearch": true,
            "estimatedTimeSeconds": 20,
            "description": "sesja XIV"
        }"#;
        let classifier = IntentClassifier::new(Arc::new(MockCompletion::constant(response)));

        let intent = classifier.detect_intent("Co było na sesji XIV?", None).await;

        assert_eq!(intent.primary_intent, "session_search");
        assert_eq!(intent.secondary_intents, vec!["youtube_search"]);
        assert_eq!(intent.confidence, 0.9);
        assert_eq!(intent.entities.session_numbers, vec![14, 17, 9]);
        assert!(intent.requires_deep_search);
    }

    #[tokio::test]
    async fn test_strips_code_fences() {
        let response = "```json\n{\"primaryIntent\": \"rag_search\"}\n```";
        let classifier = IntentClassifier::new(Arc::new(MockCompletion::constant(response)));

        let intent = classifier.detect_intent("pytanie", None).await;

        assert_eq!(intent.primary_intent, "rag_search");
        assert_eq!(intent.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_missing_primary_defaults_to_simple_answer() {
        let classifier =
            IntentClassifier::new(Arc::new(MockCompletion::constant(r#"{"confidence": 0.7}"#)));

        let intent = classifier.detect_intent("dzień dobry", None).await;

        assert_eq!(intent.primary_intent, SIMPLE_ANSWER);
        assert_eq!(intent.confidence, 0.7);
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back() {
        let classifier =
            IntentClassifier::new(Arc::new(MockCompletion::constant("nie jestem JSON-em")));

        let intent = classifier.detect_intent("pytanie", None).await;

        assert_eq!(intent.primary_intent, "rag_search");
        assert_eq!(intent.confidence, 0.5);
        assert_eq!(intent.estimated_time_seconds, 15);
        assert!(intent.entities.person_names.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let classifier = IntentClassifier::new(Arc::new(FailingCompletion::new("quota")));

        let intent = classifier.detect_intent("pytanie", Some("wcześniejszy kontekst")).await;

        assert_eq!(intent.primary_intent, "rag_search");
        assert!(!intent.requires_deep_search);
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```JSON\n{}\n```  "), "{}");
    }

    #[test]
    fn test_confidence_is_clamped() {
        let intent = parse_intent(r#"{"primaryIntent": "rag_search", "confidence": 1.8}"#).unwrap();
        assert_eq!(intent.confidence, 1.0);
    }
}
