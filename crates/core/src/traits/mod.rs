//! Trait seams between the engine and its collaborators.

pub mod llm;
pub mod tools;

pub use llm::CompletionClient;
pub use tools::ToolHandler;
