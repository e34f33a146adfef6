#![deny(unused)]
//! Query Orchestration Engine for Radny AI.
//!
//! Routes a user message through intent classification, ordered tool
//! dispatch with failure isolation, an empty-result fallback cascade, and
//! answer synthesis with citations. The engine is stateless: every call
//! builds its own accumulators and returns one [`OrchestrationResult`].
//!
//! [`OrchestrationResult`]: radny_core::OrchestrationResult

pub mod cascade;
pub mod classifier;
pub mod dispatcher;
pub mod engine;
pub mod gate;
pub mod normalizer;
pub mod registry;
pub mod synthesizer;

pub use classifier::IntentClassifier;
pub use dispatcher::ToolDispatcher;
pub use engine::{Orchestrator, OrchestratorConfig};
pub use gate::should_use_orchestrator;
pub use registry::ToolRegistry;
pub use synthesizer::ResponseSynthesizer;
