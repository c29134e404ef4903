//! Answer generation with a bounded tool-calling loop.
//!
//! Drives the multi-round conversation with the reasoning engine: submit the
//! conversation plus tool declarations, dispatch any requested tool calls
//! through the registry, fold the results back in, and repeat up to a fixed
//! round limit. The loop is an explicit state machine so the termination
//! guarantee is auditable.

use crate::config::Prompts;
use crate::engine::{ChatModel, GenerationConfig, ModelResponse, ToolCallRequest, Turn};
use crate::error::Result;
use crate::tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of tool-calling rounds per query.
///
/// Engine invocations per query are bounded by this plus one forced final
/// call when the limit is exhausted while tool calls are still requested.
pub const MAX_TOOL_ROUNDS: usize = 2;

/// Fixed user-facing message returned when a tool execution fails.
pub const TOOL_FAILURE_MESSAGE: &str = "An error occurred while executing the tool.";

/// States of the generation loop.
enum LoopState<'a> {
    /// About to submit the conversation for round `round`.
    AwaitingEngine { round: usize },
    /// Dispatching the tool calls requested in round `round`.
    DispatchingTools {
        round: usize,
        calls: Vec<ToolCallRequest>,
        registry: &'a ToolRegistry,
    },
    /// Round limit reached with tool calls outstanding; one last submission
    /// without tool declarations forces a natural-language answer.
    ForcedFinal,
    /// Final answer available.
    Done(String),
}

/// Orchestrates response generation with optional tool usage and
/// conversation context.
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    config: GenerationConfig,
}

impl AnswerGenerator {
    /// Create a new generator over the given chat model.
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self::with_config(model, prompts, GenerationConfig::default())
    }

    /// Create a generator with explicit decoding configuration.
    pub fn with_config(model: Arc<dyn ChatModel>, prompts: Prompts, config: GenerationConfig) -> Self {
        Self {
            model,
            prompts,
            config,
        }
    }

    /// Generate a response to `query`.
    ///
    /// `history` is an optional rendered summary of the prior conversation.
    /// Tool calls are only honored when a registry is supplied; without one
    /// a tool-requesting response is returned as its raw text.
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        registry: Option<&ToolRegistry>,
    ) -> Result<String> {
        let mut contents = Vec::new();
        if let Some(history) = history {
            contents.push(Turn::user(history));
        }
        contents.push(Turn::system(self.prompts.system.clone()));
        contents.push(Turn::user(query));

        let definitions = registry.map(|r| r.definitions()).unwrap_or_default();

        let mut state = LoopState::AwaitingEngine { round: 0 };
        loop {
            state = match state {
                LoopState::AwaitingEngine { round } if round >= MAX_TOOL_ROUNDS => {
                    LoopState::ForcedFinal
                }
                LoopState::AwaitingEngine { round } => {
                    debug!(round, "Submitting to engine");
                    let response = self
                        .model
                        .generate(&contents, &definitions, &self.config)
                        .await?;

                    match (response.tool_calls.is_empty(), registry) {
                        (true, _) | (false, None) => LoopState::Done(response.text),
                        (false, Some(registry)) => {
                            let calls = response.tool_calls.clone();
                            contents.push(Turn::tool_calls(response.tool_calls));
                            LoopState::DispatchingTools {
                                round,
                                calls,
                                registry,
                            }
                        }
                    }
                }
                LoopState::DispatchingTools {
                    round,
                    calls,
                    registry,
                } => {
                    // Dispatch sequentially, in request order; a failure
                    // aborts the whole generation.
                    let mut failed = false;
                    for call in &calls {
                        match registry.execute(&call.name, call.arguments.clone()).await {
                            Ok(output) => {
                                contents.push(Turn::tool_result(&call.id, &call.name, output));
                            }
                            Err(error) => {
                                warn!(tool = %call.name, %error, "Tool execution failed");
                                failed = true;
                                break;
                            }
                        }
                    }
                    if failed {
                        LoopState::Done(TOOL_FAILURE_MESSAGE.to_string())
                    } else {
                        LoopState::AwaitingEngine { round: round + 1 }
                    }
                }
                LoopState::ForcedFinal => {
                    debug!("Round limit reached, forcing tool-free final answer");
                    let response: ModelResponse =
                        self.model.generate(&contents, &[], &self.config).await?;
                    LoopState::Done(response.text)
                }
                LoopState::Done(answer) => return Ok(answer),
            };
        }
    }
}
