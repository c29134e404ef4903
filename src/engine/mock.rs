//! Mock chat model for testing.
//!
//! Returns scripted responses in order and records every request it
//! receives, so tests can assert call counts and conversation shape
//! without network dependencies.

use super::{ChatModel, GenerationConfig, ModelResponse, ToolDefinition, Turn};
use crate::error::{KursError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded model invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The turns submitted to the model.
    pub turns: Vec<Turn>,
    /// Names of the tool declarations attached to the request.
    pub tool_names: Vec<String>,
}

/// Scripted chat model.
pub struct MockChatModel {
    script: Mutex<VecDeque<ModelResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
    fail_with: Option<String>,
}

impl MockChatModel {
    /// Create a mock that plays back the given responses in order.
    pub fn new(script: Vec<ModelResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    /// Create a mock whose every invocation fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded invocations.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn generate(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
        _config: &GenerationConfig,
    ) -> Result<ModelResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            turns: turns.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });

        if let Some(message) = &self.fail_with {
            return Err(KursError::Generation(message.clone()));
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| KursError::Generation("Mock script exhausted".to_string()))
    }
}
