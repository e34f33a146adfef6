//! Shared data types for the orchestration engine.

pub mod intent;
pub mod orchestration;
pub mod tool;

pub use intent::{sanitize_session_numbers, Intent, IntentEntities};
pub use orchestration::{OrchestrationResult, Source};
pub use tool::{ToolResult, EXHAUSTIVE_SEARCH, SIMPLE_ANSWER};
