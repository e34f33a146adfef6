//! Completion service interface.

use async_trait::async_trait;

use crate::error::Result;

/// The one LLM capability the engine depends on.
///
/// Passed explicitly to the classifier and synthesizer so both are trivially
/// testable with a scripted client. Implementations must bound the call with
/// a timeout; a timed-out or failed call surfaces as an `Err`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for a system instruction plus user payload.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
