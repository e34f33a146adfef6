//! Axum-based HTTP server for the gateway.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use radny_core::{CompletionClient, Intent, Result, Source};
use radny_orchestrator::{should_use_orchestrator, IntentClassifier, Orchestrator};

/// System prompt for questions answered without tool dispatch.
const DIRECT_SYSTEM_PROMPT: &str = "Jesteś asystentem radnego gminy. Odpowiadaj \
zwięźle i rzeczowo po polsku. Jeśli pytanie wymaga danych z dokumentów gminy, \
poproś użytkownika o doprecyzowanie.";

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Full orchestration pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Standalone classifier for the intent debug endpoint.
    pub classifier: IntentClassifier,
    /// Completion client for non-orchestrated questions.
    pub llm: Arc<dyn CompletionClient>,
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(
        config: GatewayConfig,
        orchestrator: Arc<Orchestrator>,
        llm: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                orchestrator,
                classifier: IntentClassifier::new(llm.clone()),
                llm,
            }),
        }
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/query", post(query_handler))
            .route("/v1/intent", post(intent_handler))
            .with_state(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| radny_core::Error::gateway(format!("Failed to bind: {}", e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| radny_core::Error::gateway(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query request.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// User message.
    pub message: String,
    /// Optional conversation context.
    pub context: Option<String>,
}

/// Query response.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Trace ID for this request.
    pub trace_id: String,
    /// Whether the message went through the orchestration pipeline.
    pub orchestrated: bool,
    /// Answer text.
    pub response: String,
    /// Classified intent (orchestrated path only).
    pub intent: Option<Intent>,
    /// Source citations.
    pub sources: Vec<Source>,
    /// Per-tool failure notices.
    pub warnings: Vec<String>,
    /// Wall-clock time.
    pub total_time_ms: u64,
}

/// Intent-only request.
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    /// Message to classify.
    pub message: String,
    /// Optional conversation context.
    pub context: Option<String>,
}

/// Intent response.
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    /// Trace ID.
    pub trace_id: String,
    /// Whether the invocation gate would route this message to the engine.
    pub orchestrated: bool,
    /// Classified intent.
    pub intent: Intent,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Trace ID.
    pub trace_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query handler.
///
/// Routes through the orchestration engine when the invocation gate matches
/// the message; otherwise answers with a single lightweight completion.
async fn query_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    tracing::info!(
        trace_id = %trace_id,
        message_len = payload.message.len(),
        "Processing query"
    );

    if !should_use_orchestrator(&payload.message) {
        tracing::debug!(trace_id = %trace_id, "Gate bypass, answering directly");
        return match state
            .llm
            .complete(DIRECT_SYSTEM_PROMPT, &payload.message)
            .await
        {
            Ok(text) => (
                StatusCode::OK,
                Json(QueryResponse {
                    trace_id,
                    orchestrated: false,
                    response: text,
                    intent: None,
                    sources: Vec::new(),
                    warnings: Vec::new(),
                    total_time_ms: start.elapsed().as_millis() as u64,
                }),
            )
                .into_response(),
            Err(e) => {
                tracing::error!(trace_id = %trace_id, error = %e, "Direct completion failed");
                error_response(trace_id, "COMPLETION_ERROR", e.to_string())
            }
        };
    }

    match state
        .orchestrator
        .process(&payload.message, payload.context.as_deref())
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(QueryResponse {
                trace_id,
                orchestrated: true,
                response: result.synthesized_response,
                intent: Some(result.intent),
                sources: result.sources,
                warnings: result.warnings,
                total_time_ms: result.total_time_ms,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, "Orchestration failed");
            error_response(trace_id, "ORCHESTRATION_ERROR", e.to_string())
        }
    }
}

/// Intent classification handler (for debugging/testing).
async fn intent_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IntentRequest>,
) -> impl IntoResponse {
    let trace_id = Uuid::new_v4().to_string();
    let orchestrated = should_use_orchestrator(&payload.message);
    let intent = state
        .classifier
        .detect_intent(&payload.message, payload.context.as_deref())
        .await;

    (
        StatusCode::OK,
        Json(IntentResponse {
            trace_id,
            orchestrated,
            intent,
        }),
    )
}

fn error_response(trace_id: String, code: &str, message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            code: code.to_string(),
            message,
            trace_id,
        }),
    )
        .into_response()
}
