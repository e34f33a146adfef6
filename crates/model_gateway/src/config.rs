use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use radny_core::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub providers: Vec<ProviderDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDefinition {
    pub name: String,
    pub base_url: Option<String>,
    pub models: Vec<ModelDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub id: String,
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            radny_core::Error::model_provider(format!("Failed to read provider config: {}", e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            radny_core::Error::model_provider(format!("Failed to parse provider config: {}", e))
        })?;

        Ok(config)
    }
}
