//! Rig completion client adapter.
//!
//! Wraps Rig's provider agents behind the engine's `CompletionClient`
//! contract: one system instruction, one user payload, one text response,
//! bounded by a timeout.

use async_trait::async_trait;
use std::time::Duration;

use radny_core::{CompletionClient, Error, Result};

// Import required Rig traits
use rig::client::{CompletionClient as RigCompletion, ProviderClient};
use rig::completion::Prompt;

/// Provider type for Rig clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigProvider {
    OpenAI,
    Anthropic,
}

/// Configuration for a Rig client.
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// Provider to use.
    pub provider: RigProvider,
    /// Model name.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            provider: RigProvider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RigConfig {
    /// Create config for OpenAI.
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::OpenAI,
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create config for Anthropic.
    pub fn anthropic(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::Anthropic,
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Rig-based completion client.
///
/// Provider API keys are read from the environment (`OPENAI_API_KEY`,
/// `ANTHROPIC_API_KEY`), checked up front so a missing key surfaces as an
/// error instead of a panic inside the provider constructor.
pub struct RigCompletionClient {
    config: RigConfig,
}

impl RigCompletionClient {
    /// Create a new Rig client with the given configuration.
    pub fn new(config: RigConfig) -> Self {
        Self { config }
    }

    /// Create a client for OpenAI GPT-4o-mini.
    pub fn gpt4o_mini() -> Self {
        Self::new(RigConfig::openai("gpt-4o-mini"))
    }

    /// Create a client for Claude Haiku.
    pub fn claude_haiku() -> Self {
        Self::new(RigConfig::anthropic("claude-3-5-haiku-latest"))
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    async fn call_openai(&self, system: &str, user: &str) -> Result<String> {
        use rig::providers::openai;

        if std::env::var("OPENAI_API_KEY").is_err() {
            return Err(Error::model_provider("OPENAI_API_KEY not set"));
        }

        let client = openai::Client::from_env();
        let agent = client.agent(&self.config.model).preamble(system).build();

        agent
            .prompt(user)
            .await
            .map_err(|e| Error::model_provider(format!("OpenAI error: {}", e)))
    }

    async fn call_anthropic(&self, system: &str, user: &str) -> Result<String> {
        use rig::providers::anthropic;

        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            return Err(Error::model_provider("ANTHROPIC_API_KEY not set"));
        }

        let client = anthropic::Client::from_env();
        let agent = client.agent(&self.config.model).preamble(system).build();

        agent
            .prompt(user)
            .await
            .map_err(|e| Error::model_provider(format!("Anthropic error: {}", e)))
    }
}

#[async_trait]
impl CompletionClient for RigCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!(
            provider = ?self.config.provider,
            model = %self.config.model,
            prompt_len = user.len(),
            "Calling completion service"
        );

        let call = async {
            match self.config.provider {
                RigProvider::OpenAI => self.call_openai(system, user).await,
                RigProvider::Anthropic => self.call_anthropic(system, user).await,
            }
        };

        tokio::time::timeout(self.config.timeout, call)
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "completion call exceeded {} s",
                    self.config.timeout.as_secs()
                ))
            })?
    }
}

/// Create a default completion client based on available API keys.
pub fn create_default_client() -> Result<RigCompletionClient> {
    if std::env::var("OPENAI_API_KEY").is_ok() {
        Ok(RigCompletionClient::gpt4o_mini())
    } else if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        Ok(RigCompletionClient::claude_haiku())
    } else {
        Err(Error::model_provider(
            "No API key found. Set OPENAI_API_KEY or ANTHROPIC_API_KEY",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = RigConfig::anthropic("claude-3-5-haiku-latest")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.provider, RigProvider::Anthropic);
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
