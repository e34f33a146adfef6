//! Tool registry: name → handler mapping, populated at startup.

use dashmap::DashMap;
use std::sync::Arc;

use radny_core::ToolHandler;

/// Thread-safe registry of tool handlers.
///
/// The set of tools is fixed once wiring completes; the dispatcher only
/// reads from it. Registering an existing name replaces the handler, which
/// only happens in tests.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: DashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name.
    pub fn register(&self, handler: Arc<dyn ToolHandler>) {
        let name = handler.name().to_string();
        tracing::info!(tool = %name, "Registering tool handler");
        self.handlers.insert(name, handler);
    }

    /// Look up a handler by tool name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).map(|entry| entry.value().clone())
    }

    /// Names of all registered tools, unordered.
    pub fn names(&self) -> Vec<String> {
        self.handlers.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radny_core::mocks::RecordingHandler;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(RecordingHandler::new("rag_search", json!({}))));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("rag_search").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(RecordingHandler::new("rag_search", json!({"v": 1}))));
        registry.register(Arc::new(RecordingHandler::new("rag_search", json!({"v": 2}))));

        assert_eq!(registry.len(), 1);
    }
}
