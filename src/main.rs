#![deny(unused)]
//! Radny AI - Query Orchestration Engine
//!
//! Assistant backend for Polish local-government councillors: classifies the
//! user's question, dispatches the matching tools, and synthesizes a cited
//! answer over an Axum gateway.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;

use radny_core::{AppConfig, CompletionClient};
use radny_gateway::{configure_tracing, GatewayConfig, GatewayServer};
use radny_model_gateway::{RigCompletionClient, StaticCompletion};
use radny_orchestrator::{Orchestrator, OrchestratorConfig, ToolRegistry};

const OFFLINE_RESPONSE: &str =
    "Asystent działa w trybie offline. Skonfiguruj klucz API, aby uzyskać pełne odpowiedzi.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configure_tracing();

    tracing::info!("Starting Radny AI v{}", env!("CARGO_PKG_VERSION"));

    let app_config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config files, using defaults");
            AppConfig::default()
        }
    };

    // Keys from config files take effect through the same env vars the
    // provider clients read.
    if let Some(key) = &app_config.model_gateway.openai_api_key {
        if std::env::var("OPENAI_API_KEY").is_err() {
            std::env::set_var("OPENAI_API_KEY", key.expose_secret());
        }
    }
    if let Some(key) = &app_config.model_gateway.anthropic_api_key {
        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            std::env::set_var("ANTHROPIC_API_KEY", key.expose_secret());
        }
    }

    let completion_timeout = Duration::from_millis(app_config.orchestrator.completion_timeout_ms);

    let llm: Arc<dyn CompletionClient> = {
        let providers_path = std::path::Path::new("providers.json");
        if providers_path.exists() {
            tracing::info!("Loading LLM config from providers.json");
            match radny_model_gateway::config::ProviderConfig::load(providers_path).await {
                Ok(cfg) => match radny_model_gateway::create_client_from_config(&cfg) {
                    Ok(client) => Arc::new(client.with_timeout(completion_timeout)),
                    Err(e) => {
                        tracing::warn!("Failed to create client from config: {}. Fallback to env vars.", e);
                        default_or_offline(&app_config.model_gateway.default_provider, completion_timeout)
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to parse providers.json: {}. Fallback to env vars.", e);
                    default_or_offline(&app_config.model_gateway.default_provider, completion_timeout)
                }
            }
        } else {
            tracing::info!("No providers.json found. Using environment variables.");
            default_or_offline(&app_config.model_gateway.default_provider, completion_timeout)
        }
    };

    // Tool handlers are wired per deployment; the engine answers directly
    // when a classified tool has no registered handler.
    let registry = Arc::new(ToolRegistry::new());
    tracing::info!(tools_count = registry.len(), "Tool registry initialized");

    let orchestrator = Arc::new(Orchestrator::new(
        llm.clone(),
        registry,
        OrchestratorConfig {
            tool_timeout: Duration::from_millis(app_config.orchestrator.tool_timeout_ms),
            context_char_budget: app_config.orchestrator.context_char_budget,
        },
    ));

    let config = GatewayConfig {
        host: app_config.server.host.clone(),
        port: app_config.server.port,
        enable_cors: true,
        enable_tracing: true,
    };

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Gateway initialized"
    );

    let server = GatewayServer::new(config, orchestrator, llm);
    server.run().await?;

    Ok(())
}

fn default_or_offline(preferred_provider: &str, timeout: Duration) -> Arc<dyn CompletionClient> {
    // Preferred provider wins when its key is present; otherwise fall back
    // to whatever key is available.
    if preferred_provider.eq_ignore_ascii_case("anthropic")
        && std::env::var("ANTHROPIC_API_KEY").is_ok()
    {
        return Arc::new(RigCompletionClient::claude_haiku().with_timeout(timeout));
    }

    match radny_model_gateway::create_default_client() {
        Ok(client) => Arc::new(client.with_timeout(timeout)),
        Err(e) => {
            tracing::warn!("Failed to create default LLM client: {}. Running offline.", e);
            Arc::new(StaticCompletion::new(OFFLINE_RESPONSE))
        }
    }
}
