//! The orchestration engine: classify → dispatch → cascade → synthesize.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use radny_core::{CompletionClient, Error, OrchestrationResult, Result};

use crate::classifier::IntentClassifier;
use crate::dispatcher::ToolDispatcher;
use crate::registry::ToolRegistry;
use crate::synthesizer::ResponseSynthesizer;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Per-tool execution timeout.
    pub tool_timeout: Duration,
    /// Character budget for the synthesis context buffer.
    pub context_char_budget: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tool_timeout: Duration::from_secs(30),
            context_char_budget: 12_000,
        }
    }
}

/// Stateless orchestration core.
///
/// Holds no mutable state between invocations; concurrent `process` calls
/// are independent. Per call the flow is
/// `Classifying → Dispatching → (Cascading)* → Synthesizing`.
pub struct Orchestrator {
    classifier: IntentClassifier,
    dispatcher: ToolDispatcher,
    synthesizer: ResponseSynthesizer,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        registry: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(llm.clone()),
            dispatcher: ToolDispatcher::new(registry, config.tool_timeout),
            synthesizer: ResponseSynthesizer::new(llm, config.context_char_budget),
        }
    }

    /// Run one orchestration call.
    ///
    /// Classification failures are absorbed into the fallback intent and
    /// tool failures into per-tool results plus `warnings`; only a failed
    /// synthesis call makes this return `Err`.
    pub async fn process(
        &self,
        message: &str,
        context: Option<&str>,
    ) -> Result<OrchestrationResult> {
        self.process_with_cancel(message, context, &CancellationToken::new())
            .await
    }

    /// [`process`](Self::process) with an external cancellation signal.
    ///
    /// A triggered token stops scheduling further tools and skips both
    /// completion calls; tools already in flight are not forcibly aborted.
    pub async fn process_with_cancel(
        &self,
        message: &str,
        context: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationResult> {
        let start = Instant::now();

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let intent = self.classifier.detect_intent(message, context).await;
        tracing::info!(
            primary = %intent.primary_intent,
            secondary_count = intent.secondary_intents.len(),
            "Dispatching tools"
        );

        let tool_results = self.dispatcher.execute_tools(&intent, message, cancel).await;

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let (synthesized_response, sources) = self
            .synthesizer
            .synthesize(message, &intent, &tool_results)
            .await?;

        let warnings = OrchestrationResult::warnings_for(&tool_results);
        let total_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            tools = tool_results.len(),
            warnings = warnings.len(),
            total_time_ms,
            "Orchestration complete"
        );

        Ok(OrchestrationResult {
            intent,
            tool_results,
            synthesized_response,
            sources,
            total_time_ms,
            warnings,
        })
    }
}
