use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub orchestrator: OrchestratorConfig,
    pub model_gateway: ModelGatewayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrchestratorConfig {
    /// Per-tool execution timeout.
    pub tool_timeout_ms: u64,

    /// Character budget for the synthesis context buffer.
    pub context_char_budget: usize,

    /// Timeout for classifier and synthesizer completion calls.
    pub completion_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelGatewayConfig {
    pub default_provider: String,
    pub openai_api_key: Option<Secret<String>>,
    pub anthropic_api_key: Option<Secret<String>>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("RADNY_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__SERVER__PORT=3000 to app.server.port
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 3000,
            },
            orchestrator: OrchestratorConfig::default(),
            model_gateway: ModelGatewayConfig {
                default_provider: "openai".into(),
                openai_api_key: None,
                anthropic_api_key: None,
            },
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tool_timeout_ms: 30_000,
            context_char_budget: 12_000,
            completion_timeout_ms: 60_000,
        }
    }
}
