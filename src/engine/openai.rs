//! OpenAI-backed chat model.

use super::{ChatModel, GenerationConfig, ModelResponse, Role, ToolCallRequest, ToolDefinition, Turn, TurnContent};
use crate::error::{KursError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Chat model backed by the OpenAI chat completions API.
pub struct OpenAiChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    /// Create a new model wrapper for the given model name.
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }

    fn build_messages(turns: &[Turn]) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(turns.len());

        for turn in turns {
            let message: ChatCompletionRequestMessage = match (&turn.role, &turn.content) {
                (Role::System, TurnContent::Text(text)) => {
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(text.clone())
                        .build()
                        .map_err(|e| KursError::Generation(e.to_string()))?
                        .into()
                }
                (Role::User, TurnContent::Text(text)) => {
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(text.clone())
                        .build()
                        .map_err(|e| KursError::Generation(e.to_string()))?
                        .into()
                }
                (Role::Model, TurnContent::Text(text)) => {
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(text.clone())
                        .build()
                        .map_err(|e| KursError::Generation(e.to_string()))?
                        .into()
                }
                (Role::Model, TurnContent::ToolCalls(calls)) => {
                    let tool_calls: Vec<ChatCompletionMessageToolCall> = calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        })
                        .collect();
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(tool_calls)
                        .build()
                        .map_err(|e| KursError::Generation(e.to_string()))?
                        .into()
                }
                (Role::Tool, TurnContent::ToolResult(result)) => {
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(result.call_id.clone())
                        .content(result.output.clone())
                        .build()
                        .map_err(|e| KursError::Generation(e.to_string()))?
                        .into()
                }
                (role, _) => {
                    return Err(KursError::Generation(format!(
                        "Unsupported turn content for role {:?}",
                        role
                    )))
                }
            };
            messages.push(message);
        }

        Ok(messages)
    }

    fn to_openai_tool(definition: &ToolDefinition) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: definition.name.clone(),
                description: Some(definition.description.clone()),
                parameters: Some(definition.parameters.clone()),
                strict: None,
            },
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn generate(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
        config: &GenerationConfig,
    ) -> Result<ModelResponse> {
        let messages = Self::build_messages(turns)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .temperature(config.temperature)
            .max_tokens(config.max_output_tokens);
        if !tools.is_empty() {
            builder.tools(tools.iter().map(Self::to_openai_tool).collect::<Vec<_>>());
        }
        let request = builder
            .build()
            .map_err(|e| KursError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| KursError::OpenAI(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| KursError::Generation("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                // Argument strings from the API are JSON objects; an
                // unparseable payload becomes an empty object and is left
                // for the tool to reject.
                let arguments: Value = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| Value::Object(Default::default()));
                ToolCallRequest {
                    id: call.id,
                    name: call.function.name,
                    arguments,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            tool_calls = tool_calls.len(),
            "Model responded"
        );

        Ok(ModelResponse {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}
