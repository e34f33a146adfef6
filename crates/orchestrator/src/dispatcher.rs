//! Tool dispatcher: ordered execution with per-tool failure isolation.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use radny_core::{Intent, ToolResult, EXHAUSTIVE_SEARCH, SIMPLE_ANSWER};

use crate::cascade;
use crate::normalizer;
use crate::registry::ToolRegistry;

/// Executes the intent's tool list in submission order.
///
/// Tools run sequentially: deterministic result ordering is what citation
/// numbering and the synthesizer's first-match scan rely on. One failing
/// handler becomes one failed [`ToolResult`]; the batch always continues.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    tool_timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, tool_timeout: Duration) -> Self {
        Self {
            registry,
            tool_timeout,
        }
    }

    /// Run `[primary] + secondaries` against the registry.
    ///
    /// Duplicates in the list are executed as submitted. After each
    /// successful search-class tool, the fallback cascade may append an
    /// `exhaustive_search` result. A triggered cancel token stops
    /// scheduling further tools; results gathered so far are returned.
    pub async fn execute_tools(
        &self,
        intent: &Intent,
        message: &str,
        cancel: &CancellationToken,
    ) -> Vec<ToolResult> {
        let submitted = intent.tool_list();
        let mut results = Vec::with_capacity(submitted.len());

        for tool in &submitted {
            if cancel.is_cancelled() {
                tracing::info!(pending = %tool, "Cancellation requested, stopping tool dispatch");
                break;
            }

            let result = self.run_tool(tool, message, intent).await;
            let wants_fallback = cascade::should_trigger(&result, &submitted);
            results.push(result);

            if wants_fallback && !cancel.is_cancelled() {
                if let Some(fallback) = self.run_fallback(message, intent).await {
                    results.push(fallback);
                }
            }
        }

        results
    }

    /// Execute one tool with timing, timeout, and failure isolation.
    async fn run_tool(&self, tool: &str, message: &str, intent: &Intent) -> ToolResult {
        if tool == SIMPLE_ANSWER {
            return ToolResult::noop(tool);
        }

        let Some(handler) = self.registry.get(tool) else {
            tracing::debug!(tool = %tool, "No handler registered, recording no-op result");
            return ToolResult::noop(tool);
        };

        tracing::debug!(tool = %tool, "Executing tool");
        let start = Instant::now();
        let outcome = tokio::time::timeout(self.tool_timeout, handler.execute(message, intent)).await;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(raw)) => {
                let envelope = normalizer::normalize(raw);
                ToolResult {
                    tool: tool.to_string(),
                    success: true,
                    data: envelope.data,
                    message: envelope.message,
                    ui_action: envelope.ui_action,
                    navigation_target: envelope.navigation_target,
                    execution_time_ms,
                    error: None,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(tool = %tool, error = %e, "Tool execution failed");
                ToolResult::failure(tool, e.to_string(), execution_time_ms)
            }
            Err(_) => {
                tracing::warn!(
                    tool = %tool,
                    timeout_ms = self.tool_timeout.as_millis() as u64,
                    "Tool execution timed out"
                );
                ToolResult::failure(
                    tool,
                    format!("timed out after {} ms", self.tool_timeout.as_millis()),
                    execution_time_ms,
                )
            }
        }
    }

    /// Run the exhaustive-search fallback; its errors are discarded.
    async fn run_fallback(&self, message: &str, intent: &Intent) -> Option<ToolResult> {
        tracing::info!("Empty search result, running exhaustive search fallback");
        let result = self.run_tool(EXHAUSTIVE_SEARCH, message, intent).await;

        if result.success {
            Some(result)
        } else {
            tracing::debug!(
                error = result.error.as_deref().unwrap_or(""),
                "Fallback search failed, discarding its result"
            );
            None
        }
    }
}
