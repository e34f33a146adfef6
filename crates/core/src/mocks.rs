//! Mock implementations of core traits for testing.
//!
//! Shared by unit tests in the orchestrator crate and the workspace
//! integration tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::traits::{CompletionClient, ToolHandler};
use crate::types::Intent;

// =============================================================================
// Mock Completion Client
// =============================================================================

/// Scripted completion client that returns predefined responses in order.
pub struct MockCompletion {
    responses: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
}

impl MockCompletion {
    /// Create a mock with a queue of responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        let idx = (*count - 1) % responses.len().max(1);
        Ok(responses.get(idx).cloned().unwrap_or_default())
    }
}

/// Completion client that always fails.
pub struct FailingCompletion {
    message: String,
}

impl FailingCompletion {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Err(Error::model_provider(self.message.clone()))
    }
}

// =============================================================================
// Mock Tool Handlers
// =============================================================================

/// Tool handler that returns a fixed payload and records its calls.
pub struct RecordingHandler {
    name: String,
    payload: Value,
    calls: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn new(name: &str, payload: Value) -> Self {
        Self {
            name: name.to_string(),
            payload,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages this handler was invoked with, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolHandler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "recording test handler"
    }

    async fn execute(&self, message: &str, _intent: &Intent) -> Result<Value> {
        self.calls.lock().unwrap().push(message.to_string());
        Ok(self.payload.clone())
    }
}

/// Tool handler that always returns an error.
pub struct FailingHandler {
    name: String,
    error: String,
}

impl FailingHandler {
    pub fn new(name: &str, error: &str) -> Self {
        Self {
            name: name.to_string(),
            error: error.to_string(),
        }
    }
}

#[async_trait]
impl ToolHandler for FailingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "failing test handler"
    }

    async fn execute(&self, _message: &str, _intent: &Intent) -> Result<Value> {
        Err(Error::tool_execution(self.error.clone()))
    }
}
