//! End-to-end tests for the orchestration pipeline with mocked collaborators.

use std::sync::Arc;

use radny_core::mocks::{FailingCompletion, MockCompletion, RecordingHandler};
use radny_core::{Error, EXHAUSTIVE_SEARCH};
use radny_orchestrator::{should_use_orchestrator, Orchestrator, OrchestratorConfig, ToolRegistry};
use serde_json::json;

fn classify_as(primary: &str, secondaries: &[&str]) -> String {
    json!({
        "primaryIntent": primary,
        "secondaryIntents": secondaries,
        "confidence": 0.9
    })
    .to_string()
}

#[tokio::test]
async fn empty_search_cascades_into_exhaustive_search() {
    let llm = Arc::new(MockCompletion::new(vec![
        classify_as("rag_search", &[]),
        "Znalazłem w szerokim wyszukiwaniu.".to_string(),
    ]));

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(RecordingHandler::new(
        "rag_search",
        json!({"results": []}),
    )));
    registry.register(Arc::new(RecordingHandler::new(
        EXHAUSTIVE_SEARCH,
        json!({"results": [{"title": "Uchwała XIV/120", "content": "treść"}]}),
    )));

    let orchestrator = Orchestrator::new(llm, registry, OrchestratorConfig::default());
    let result = orchestrator
        .process("Znajdź uchwałę o budżecie", None)
        .await
        .unwrap();

    assert_eq!(result.tool_results.len(), 2);
    assert_eq!(result.tool_results[0].tool, "rag_search");
    assert_eq!(result.tool_results[1].tool, EXHAUSTIVE_SEARCH);
    assert_eq!(result.synthesized_response, "Znalazłem w szerokim wyszukiwaniu.");
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].title, "Uchwała XIV/120");
}

#[tokio::test]
async fn action_tool_message_is_returned_verbatim() {
    let llm = Arc::new(MockCompletion::new(vec![classify_as("calendar_add", &[])]));

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(RecordingHandler::new(
        "calendar_add",
        json!({"message": "Dodałem do kalendarza: Komisja budżetowa", "data": {"id": 3}}),
    )));

    let orchestrator = Orchestrator::new(llm.clone(), registry, OrchestratorConfig::default());
    let result = orchestrator
        .process("Dodaj do kalendarza komisję budżetową", None)
        .await
        .unwrap();

    assert_eq!(
        result.synthesized_response,
        "Dodałem do kalendarza: Komisja budżetowa"
    );
    assert!(result.sources.is_empty());
    // One call for classification, none for synthesis.
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn classifier_failure_degrades_to_rag_search() {
    // Classification and synthesis share the client; a dead provider means
    // the fallback intent is used and synthesis itself fails loudly.
    let llm = Arc::new(FailingCompletion::new("provider offline"));

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(RecordingHandler::new(
        "rag_search",
        json!({"results": [{"title": "Protokół"}]}),
    )));

    let orchestrator = Orchestrator::new(llm, registry, OrchestratorConfig::default());
    let err = orchestrator.process("Znajdź protokół sesji", None).await.unwrap_err();

    assert!(matches!(err, Error::ModelProvider(_)));
}

#[tokio::test]
async fn gate_and_engine_agree_on_tool_questions() {
    assert!(should_use_orchestrator("Znajdź uchwałę budżetową z sesji XIV"));
    assert!(!should_use_orchestrator("Opowiedz mi coś ciekawego"));
}
