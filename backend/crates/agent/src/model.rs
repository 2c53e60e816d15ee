use async_trait::async_trait;
use reqwest::StatusCode;

use crate::messages::{ChatRequest, ChatResponse};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// A chat model that can answer with text or with tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatResponse, ModelError>;
}
