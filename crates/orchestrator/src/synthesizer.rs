//! Response synthesizer: turns tool results into one answer plus citations.

use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;

use radny_core::{CompletionClient, Intent, Result, Source, ToolResult, EXHAUSTIVE_SEARCH};

/// Tools whose successful `message` is returned verbatim, bypassing synthesis.
pub const ACTION_TOOLS: &[&str] = &[
    "calendar_add",
    "calendar_list",
    "calendar_edit",
    "calendar_delete",
    "task_add",
    "task_list",
    "task_complete",
    "task_delete",
    "alert_check",
    "quick_tool",
    "app_navigate",
];

/// Fixed response when no tool produced anything usable.
pub const APOLOGY: &str = "Przepraszam, nie udało mi się znaleźć informacji na ten temat. \
    Spróbuj przeformułować pytanie lub zapytać o coś innego.";

const SYNTHESIS_SYSTEM_PROMPT: &str = "Jesteś asystentem radnego gminy. Odpowiedz na pytanie \
    użytkownika wyłącznie na podstawie poniższego kontekstu z narzędzi. Odpowiadaj po polsku, \
    rzeczowo i zwięźle. Jeśli kontekst nie zawiera odpowiedzi, powiedz to wprost. Nie wymyślaj \
    faktów ani źródeł.";

pub fn is_action_tool(name: &str) -> bool {
    ACTION_TOOLS.contains(&name)
}

/// Builds the final answer from tool results.
pub struct ResponseSynthesizer {
    llm: Arc<dyn CompletionClient>,
    context_char_budget: usize,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn CompletionClient>, context_char_budget: usize) -> Self {
        Self {
            llm,
            context_char_budget,
        }
    }

    /// Synthesize a response and source list.
    ///
    /// Short-circuits (apology, action message) never touch the completion
    /// service. The one completion call here is the only place the engine
    /// can fail as a whole: its error propagates to the caller.
    pub async fn synthesize(
        &self,
        message: &str,
        _intent: &Intent,
        tool_results: &[ToolResult],
    ) -> Result<(String, Vec<Source>)> {
        let successful: Vec<&ToolResult> =
            tool_results.iter().filter(|r| r.has_payload()).collect();

        if successful.is_empty() {
            tracing::debug!("No usable tool results, returning apology");
            return Ok((APOLOGY.to_string(), Vec::new()));
        }

        // Action short-circuit: first match in submission order wins.
        for result in &successful {
            if is_action_tool(&result.tool) {
                if let Some(msg) = result.message.as_deref().filter(|m| !m.is_empty()) {
                    tracing::debug!(tool = %result.tool, "Action tool short-circuit");
                    return Ok((msg.to_string(), Vec::new()));
                }
            }
        }

        let mut context = String::new();
        let mut sources = Vec::new();

        for result in &successful {
            let remaining = self
                .context_char_budget
                .saturating_sub(context.chars().count());
            if remaining == 0 {
                break;
            }

            let mut block_sources = Vec::new();
            let block = digest_block(result, &mut block_sources);
            if block.is_empty() {
                continue;
            }

            let mut entry = String::new();
            let _ = writeln!(entry, "### Narzędzie: {}\n{}", result.tool, block);

            if entry.chars().count() > remaining {
                // A cut-off block must not contribute citations the model
                // never saw.
                context.push_str(truncate_chars(&entry, remaining));
                break;
            }

            context.push_str(&entry);
            sources.append(&mut block_sources);
        }

        let user_prompt = format!("KONTEKST:\n{}\n\nPYTANIE: {}", context, message);

        tracing::debug!(
            context_chars = context.chars().count(),
            sources = sources.len(),
            "Calling completion service for synthesis"
        );

        let response = self.llm.complete(SYNTHESIS_SYSTEM_PROMPT, &user_prompt).await?;
        Ok((response, sources))
    }
}

/// Truncate to a character budget without splitting a UTF-8 code point.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =============================================================================
// Per-tool digest and source extraction
// =============================================================================

/// Append a human-readable digest for one result, collecting its sources.
///
/// Each registered tool family has its own payload shape; extraction
/// dispatches on the tool name, not on runtime shape-sniffing.
fn digest_block(result: &ToolResult, sources: &mut Vec<Source>) -> String {
    let data = result.data.as_ref();

    match result.tool.as_str() {
        "session_search" => digest_sessions(data, sources),
        "rag_search" => digest_rag(data, sources),
        "person_search" => digest_people(data),
        "document_fetch" => digest_documents(data, sources),
        "budget_analysis" => digest_budget(data),
        "youtube_search" => digest_videos(data, sources),
        "data_sources_search" => digest_data_sources(data, sources),
        name if name == EXHAUSTIVE_SEARCH => digest_rag(data, sources),
        _ => digest_generic(result),
    }
}

fn items<'a>(data: Option<&'a Value>, key: &str) -> &'a [Value] {
    data.and_then(|d| d.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn str_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

fn digest_sessions(data: Option<&Value>, sources: &mut Vec<Source>) -> String {
    let mut out = String::new();
    for item in items(data, "results") {
        let title = str_field(item, "title").unwrap_or("sesja rady");
        let date = str_field(item, "date").unwrap_or("");
        let _ = writeln!(out, "- {} {}", title, date);
        if let Some(excerpt) = str_field(item, "excerpt") {
            let _ = writeln!(out, "  {}", excerpt);
        }
        sources.push(Source::new(
            title,
            str_field(item, "url").map(String::from),
            "sesja",
        ));
    }
    out
}

fn digest_rag(data: Option<&Value>, sources: &mut Vec<Source>) -> String {
    let mut out = String::new();
    let entries = {
        let rag = items(data, "ragResults");
        if rag.is_empty() {
            items(data, "results")
        } else {
            rag
        }
    };

    for item in entries {
        let title = str_field(item, "title")
            .or_else(|| str_field(item, "source"))
            .unwrap_or("dokument");
        if let Some(content) = str_field(item, "content").or_else(|| str_field(item, "excerpt")) {
            let _ = writeln!(out, "- {}: {}", title, content);
        } else {
            let _ = writeln!(out, "- {}", title);
        }
        sources.push(Source::new(
            title,
            str_field(item, "url").map(String::from),
            "dokument",
        ));
    }
    out
}

fn digest_people(data: Option<&Value>) -> String {
    let mut out = String::new();
    for item in items(data, "results") {
        let name = str_field(item, "name").unwrap_or("osoba");
        let role = str_field(item, "role").unwrap_or("");
        let _ = writeln!(out, "- {} {}", name, role);
    }
    out
}

fn digest_documents(data: Option<&Value>, sources: &mut Vec<Source>) -> String {
    let mut out = String::new();
    for item in items(data, "documents") {
        let title = str_field(item, "title").unwrap_or("dokument");
        let _ = writeln!(out, "- {}", title);
        if let Some(content) = str_field(item, "content") {
            let _ = writeln!(out, "  {}", content);
        }
        sources.push(Source::new(
            title,
            str_field(item, "url").map(String::from),
            "dokument",
        ));
    }
    out
}

fn digest_budget(data: Option<&Value>) -> String {
    // Budget payloads are aggregates rather than lists; pass the structure
    // through compactly and let the model narrate it.
    data.map(|d| d.to_string()).unwrap_or_default()
}

fn digest_videos(data: Option<&Value>, sources: &mut Vec<Source>) -> String {
    let mut out = String::new();
    for item in items(data, "videos") {
        let title = str_field(item, "title").unwrap_or("nagranie");
        let url = str_field(item, "url").map(String::from).or_else(|| {
            str_field(item, "videoId").map(|id| format!("https://www.youtube.com/watch?v={}", id))
        });
        let _ = writeln!(out, "- {}", title);
        if let Some(transcript) = str_field(item, "transcript") {
            let _ = writeln!(out, "  {}", transcript);
        }
        sources.push(Source::new(title, url, "wideo"));
    }
    out
}

fn digest_data_sources(data: Option<&Value>, sources: &mut Vec<Source>) -> String {
    let mut out = String::new();
    for item in items(data, "results") {
        let title = str_field(item, "title").unwrap_or("wynik");
        if let Some(snippet) = str_field(item, "snippet").or_else(|| str_field(item, "content")) {
            let _ = writeln!(out, "- {}: {}", title, snippet);
        } else {
            let _ = writeln!(out, "- {}", title);
        }

        // Legal acts carry an ISAP identifier instead of a direct link.
        if let Some(address) = str_field(item, "address") {
            sources.push(Source::new(
                title,
                Some(format!(
                    "https://isap.sejm.gov.pl/isap.nsf/DocDetails.xsp?id={}",
                    address
                )),
                "akt prawny",
            ));
        } else {
            sources.push(Source::new(
                title,
                str_field(item, "url").map(String::from),
                "internet",
            ));
        }
    }
    out
}

fn digest_generic(result: &ToolResult) -> String {
    if let Some(msg) = result.message.as_deref() {
        return msg.to_string();
    }
    result
        .data
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use radny_core::mocks::{FailingCompletion, MockCompletion};
    use serde_json::json;

    fn success(tool: &str, data: Value) -> ToolResult {
        let mut result = ToolResult::noop(tool);
        result.data = Some(data);
        result
    }

    fn action(tool: &str, message: &str) -> ToolResult {
        let mut result = ToolResult::noop(tool);
        result.message = Some(message.to_string());
        result
    }

    #[tokio::test]
    async fn test_apology_when_nothing_succeeded() {
        let llm = Arc::new(MockCompletion::constant("nie powinno być wywołane"));
        let synthesizer = ResponseSynthesizer::new(llm.clone(), 12_000);

        let results = vec![
            ToolResult::failure("rag_search", "timeout", 10),
            ToolResult::failure("person_search", "403", 10),
        ];
        let (response, sources) = synthesizer
            .synthesize("pytanie", &Intent::fallback(), &results)
            .await
            .unwrap();

        assert_eq!(response, APOLOGY);
        assert!(sources.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_noop_results_also_yield_apology() {
        let llm = Arc::new(MockCompletion::constant("x"));
        let synthesizer = ResponseSynthesizer::new(llm.clone(), 12_000);

        let results = vec![ToolResult::noop("simple_answer")];
        let (response, _) = synthesizer
            .synthesize("pytanie", &Intent::simple_answer(), &results)
            .await
            .unwrap();

        assert_eq!(response, APOLOGY);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_action_short_circuit() {
        let llm = Arc::new(MockCompletion::constant("nie powinno być wywołane"));
        let synthesizer = ResponseSynthesizer::new(llm.clone(), 12_000);

        let results = vec![action("calendar_add", "Dodałem do kalendarza: Sesja XIV")];
        let (response, sources) = synthesizer
            .synthesize("dodaj sesję", &Intent::fallback(), &results)
            .await
            .unwrap();

        assert_eq!(response, "Dodałem do kalendarza: Sesja XIV");
        assert!(sources.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_action_match_wins() {
        let llm = Arc::new(MockCompletion::constant("x"));
        let synthesizer = ResponseSynthesizer::new(llm, 12_000);

        let results = vec![
            success("rag_search", json!({"results": [{"title": "Uchwała"}]})),
            action("task_add", "Zapisałem zadanie"),
            action("calendar_add", "Dodałem wydarzenie"),
        ];
        let (response, _) = synthesizer
            .synthesize("pytanie", &Intent::fallback(), &results)
            .await
            .unwrap();

        assert_eq!(response, "Zapisałem zadanie");
    }

    #[tokio::test]
    async fn test_action_tool_without_message_does_not_short_circuit() {
        let llm = Arc::new(MockCompletion::constant("Synteza."));
        let synthesizer = ResponseSynthesizer::new(llm.clone(), 12_000);

        let results = vec![
            success("calendar_list", json!({"events": []})),
            success("rag_search", json!({"results": [{"title": "Protokół"}]})),
        ];
        let (response, _) = synthesizer
            .synthesize("pytanie", &Intent::fallback(), &results)
            .await
            .unwrap();

        assert_eq!(response, "Synteza.");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_collects_sources() {
        let llm = Arc::new(MockCompletion::constant("Odpowiedź z kontekstu."));
        let synthesizer = ResponseSynthesizer::new(llm.clone(), 12_000);

        let results = vec![
            success(
                "youtube_search",
                json!({"videos": [{"title": "Sesja XIV", "videoId": "abc123"}]}),
            ),
            success(
                "data_sources_search",
                json!({"results": [
                    {"title": "Portal gminy", "url": "https://gmina.pl", "snippet": "..."},
                    {"title": "Ustawa o samorządzie", "address": "WDU19900160095"}
                ]}),
            ),
        ];

        let (response, sources) = synthesizer
            .synthesize("pytanie", &Intent::fallback(), &results)
            .await
            .unwrap();

        assert_eq!(response, "Odpowiedź z kontekstu.");
        assert_eq!(llm.call_count(), 1);
        assert_eq!(sources.len(), 3);

        assert_eq!(sources[0].kind, "wideo");
        assert_eq!(
            sources[0].url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(sources[1].kind, "internet");
        assert_eq!(sources[2].kind, "akt prawny");
        assert!(sources[2].url.as_deref().unwrap().contains("WDU19900160095"));
    }

    #[tokio::test]
    async fn test_truncated_block_contributes_no_sources() {
        let llm = Arc::new(MockCompletion::constant("Odpowiedź."));
        // Budget fits the first digest block but cuts the second one off.
        let synthesizer = ResponseSynthesizer::new(llm.clone(), 60);

        let results = vec![
            success(
                "rag_search",
                json!({"results": [{"title": "Uchwała", "content": "treść"}]}),
            ),
            success(
                "session_search",
                json!({"results": [{"title": "Sesja XIV", "url": "https://gmina.pl/xiv"}]}),
            ),
        ];

        let (_, sources) = synthesizer
            .synthesize("pytanie", &Intent::fallback(), &results)
            .await
            .unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Uchwała");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_failure_propagates() {
        let synthesizer =
            ResponseSynthesizer::new(Arc::new(FailingCompletion::new("quota exceeded")), 12_000);

        let results = vec![success("rag_search", json!({"results": [{"title": "Uchwała"}]}))];
        let err = synthesizer
            .synthesize("pytanie", &Intent::fallback(), &results)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_truncate_chars_respects_utf8() {
        let text = "żółć żółć żółć";
        let truncated = truncate_chars(text, 4);
        assert_eq!(truncated, "żółć");
    }
}
