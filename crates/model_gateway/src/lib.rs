#![deny(unused)]
//! Model gateway for Radny AI.
//!
//! Provides [`CompletionClient`] implementations over Rig provider agents,
//! a JSON provider-config loader, and an offline static client used when no
//! API key is available.
//!
//! [`CompletionClient`]: radny_core::CompletionClient

pub mod config;
pub mod rig_client;

pub use rig_client::{create_default_client, RigCompletionClient, RigConfig, RigProvider};

use async_trait::async_trait;
use radny_core::{CompletionClient, Result};

use config::ProviderConfig;

/// Create a completion client from a provider configuration file.
///
/// Uses the first supported provider/model pair found.
pub fn create_client_from_config(config: &ProviderConfig) -> Result<RigCompletionClient> {
    for provider in &config.providers {
        match provider.name.to_lowercase().as_str() {
            "openai" => {
                if let Some(model) = provider.models.first() {
                    return Ok(RigCompletionClient::new(RigConfig::openai(&model.id)));
                }
            }
            "anthropic" => {
                if let Some(model) = provider.models.first() {
                    return Ok(RigCompletionClient::new(RigConfig::anthropic(&model.id)));
                }
            }
            _ => continue,
        }
    }

    Err(radny_core::Error::model_provider(
        "No supported provider found in config",
    ))
}

/// Completion client that always returns the same text.
///
/// Stands in for a real provider in offline runs so the binary still starts
/// without API keys.
pub struct StaticCompletion {
    response: String,
}

impl StaticCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for StaticCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}
