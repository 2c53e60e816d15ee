use std::sync::Arc;

use crate::messages::{ChatRequest, ContentBlock, Message, Role};
use crate::model::{ChatModel, ModelError};
use crate::toolbox::ToolBox;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("agent stopped after {0} iterations without a final answer")]
    IterationLimit(u32),

    #[error("model returned an empty final answer")]
    EmptyAnswer,
}

/// Runs the tool-calling loop for one instruction. Holds only read-only
/// state, so one executor can serve concurrent requests.
#[derive(Clone)]
pub struct AgentExecutor {
    model: Arc<dyn ChatModel>,
    tools: ToolBox,
    system_prompt: String,
    max_iterations: u32,
}

impl AgentExecutor {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: ToolBox,
        system_prompt: String,
        max_iterations: u32,
    ) -> Self {
        Self {
            model,
            tools,
            system_prompt,
            max_iterations,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Send `user_message`, answer tool calls until the model replies
    /// without any, and return that reply's text.
    pub async fn run(&self, user_message: &str) -> Result<String, AgentError> {
        let mut messages = vec![Message::user_text(user_message)];

        for iteration in 1..=self.max_iterations {
            let response = self
                .model
                .complete(&ChatRequest {
                    system: &self.system_prompt,
                    messages: &messages,
                    tools: self.tools.specs(),
                })
                .await?;

            let calls = response.tool_calls();
            if calls.is_empty() {
                let answer = response.text();
                if answer.trim().is_empty() {
                    return Err(AgentError::EmptyAnswer);
                }
                tracing::debug!(iteration, model = self.model.model_name(), "final answer received");
                return Ok(answer);
            }

            messages.push(response.into_message());

            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                tracing::info!(iteration, tool = %call.name, "tool call");
                let output = self.tools.dispatch(&call.name, &call.input).await;
                if output.is_error {
                    tracing::warn!(iteration, tool = %call.name, "tool returned an error result");
                }
                results.push(ContentBlock::ToolResult {
                    tool_use_id: call.id,
                    content: output.content,
                    is_error: output.is_error,
                });
            }
            messages.push(Message {
                role: Role::User,
                content: results,
            });
        }

        Err(AgentError::IterationLimit(self.max_iterations))
    }
}
