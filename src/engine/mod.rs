//! Reasoning engine abstraction.
//!
//! Defines the wire types exchanged with a chat model (role-tagged turns,
//! tool declarations, tool call requests) and the `ChatModel` trait that
//! concrete providers implement. The generation loop in `generator` only
//! ever talks to this interface.

pub mod mock;
mod openai;

pub use mock::MockChatModel;
pub use openai::OpenAiChatModel;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed system instruction.
    System,
    /// End-user input (including injected conversation history).
    User,
    /// Model output, either text or tool call requests.
    Model,
    /// Result of a locally executed tool call.
    Tool,
}

/// Machine-readable declaration of a callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON schema for the tool parameters.
    pub parameters: Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back with the result.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Arguments as a JSON object.
    pub arguments: Value,
}

/// Result of executing one tool call, folded back into the conversation.
///
/// Carries the originating tool name so the model can tell results apart on
/// later rounds; this is part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Call id this result answers.
    pub call_id: String,
    /// Name of the tool that produced the output.
    pub tool_name: String,
    /// Text output of the tool.
    pub output: String,
}

/// Content of a single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnContent {
    Text(String),
    ToolCalls(Vec<ToolCallRequest>),
    ToolResult(ToolOutput),
}

/// One role-tagged turn in the working conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

impl Turn {
    /// A system-instruction turn.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: TurnContent::Text(text.into()),
        }
    }

    /// A user text turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Text(text.into()),
        }
    }

    /// A model turn carrying tool call requests.
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: Role::Model,
            content: TurnContent::ToolCalls(calls),
        }
    }

    /// A tool-result turn.
    pub fn tool_result(call_id: impl Into<String>, tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: TurnContent::ToolResult(ToolOutput {
                call_id: call_id.into(),
                tool_name: tool_name.into(),
                output: output.into(),
            }),
        }
    }
}

/// Decoding configuration for one model invocation.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Sampling temperature. Deterministic decoding uses 0.
    pub temperature: f32,
    /// Output-length ceiling in tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: 800,
        }
    }
}

/// Response from one model invocation.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Text content, possibly empty when the model only requests tools.
    pub text: String,
    /// Tool calls the model wants executed, in request order.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelResponse {
    /// A plain text response with no tool calls.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A response requesting tool calls.
    pub fn with_tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: String::new(),
            tool_calls: calls,
        }
    }
}

/// Trait for chat model implementations.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submit the conversation plus available tool declarations and return
    /// the model's response. An empty `tools` slice forbids tool calls.
    async fn generate(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
        config: &GenerationConfig,
    ) -> Result<ModelResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let turn = Turn::user("hello");
        assert_eq!(turn.role, Role::User);
        assert!(matches!(turn.content, TurnContent::Text(ref t) if t == "hello"));

        let turn = Turn::tool_result("call_1", "search_course_content", "out");
        assert_eq!(turn.role, Role::Tool);
        match turn.content {
            TurnContent::ToolResult(result) => {
                assert_eq!(result.call_id, "call_1");
                assert_eq!(result.tool_name, "search_course_content");
                assert_eq!(result.output, "out");
            }
            _ => panic!("Expected ToolResult content"),
        }
    }

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_output_tokens, 800);
    }
}
