use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use resolver_config::LlmConfig;
use serde::Serialize;

use crate::messages::{ChatRequest, ChatResponse, Message};
use crate::model::{ChatModel, ModelError};
use resolver_matching::tools::ToolSpec;

const API_VERSION: &str = "2023-06-01";

/// Client for a Messages-style tool-calling API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolSpec],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: create a client pointing at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    async fn post_with_retry(&self, body: &MessagesBody<'_>) -> Result<ChatResponse, ModelError> {
        let url = self.url();
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff_secs = std::cmp::min(1u64 << attempt, 30);
                tracing::warn!(attempt, backoff_secs, "retrying model call after backoff");
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            }

            let response = match self
                .client
                .post(&url)
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", API_VERSION)
                .json(body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() || e.is_connect() {
                        continue;
                    }
                    return Err(ModelError::RequestError(e));
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response.text().await?;
                return serde_json::from_str(&text)
                    .map_err(|e| ModelError::InvalidResponse(e.to_string()));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    let wait = std::cmp::min(retry_after, 60);
                    tracing::warn!(wait, "model rate-limited, waiting Retry-After");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
                last_error = "429 Too Many Requests".to_string();
                continue;
            }

            // 529 is the overloaded signal; treat like any 5xx
            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{status}: {body}");
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::HttpError { status, body });
        }

        Err(ModelError::MaxRetriesExceeded {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }
}

#[async_trait]
impl ChatModel for AnthropicClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatResponse, ModelError> {
        let body = MessagesBody {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: request.system,
            messages: request.messages,
            tools: request.tools,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        let response = self.post_with_retry(&body).await?;
        tracing::debug!(
            model = %self.config.model,
            stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
            blocks = response.content.len(),
            "model responded"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ContentBlock;
    use resolver_matching::tools::add_numbers_spec;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost".to_string(),
            api_key: "sk-test".to_string(),
            model: "test-model".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            top_p: None,
            max_iterations: 5,
            max_retries: 2,
            timeout_secs: 5,
        }
    }

    fn client_for(server: &MockServer, config: LlmConfig) -> AnthropicClient {
        AnthropicClient::new(config).unwrap().with_base_url(&server.uri())
    }

    async fn ask(client: &AnthropicClient) -> Result<ChatResponse, ModelError> {
        let messages = vec![Message::user_text("hello")];
        let tools = vec![add_numbers_spec()];
        client
            .complete(&ChatRequest {
                system: "be precise",
                messages: &messages,
                tools: &tools,
            })
            .await
    }

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", API_VERSION))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 1024,
                "system": "be precise",
                "messages": [{ "role": "user", "content": [{ "type": "text", "text": "hello" }] }],
                "tools": [{ "name": "add_multiple_numbers" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "hi" }],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = ask(&client_for(&server, test_config())).await.unwrap();
        assert_eq!(response.text(), "hi");
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[tokio::test]
    async fn top_p_is_sent_only_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "top_p": 0.5 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "tool_use", "id": "t1", "name": "add_multiple_numbers", "input": { "numbers": [1] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = test_config();
        config.top_p = Some(0.5);
        let response = ask(&client_for(&server, config)).await.unwrap();
        assert!(matches!(response.content[0], ContentBlock::ToolUse { .. }));
    }

    #[tokio::test]
    async fn retries_on_529() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "done" }]
            })))
            .mount(&server)
            .await;

        let response = ask(&client_for(&server, test_config())).await.unwrap();
        assert_eq!(response.text(), "done");
    }

    #[tokio::test]
    async fn fails_fast_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let err = ask(&client_for(&server, test_config())).await.unwrap_err();
        match err {
            ModelError::HttpError { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "bad request");
            }
            other => panic!("expected HttpError, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn max_retries_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("always failing"))
            .mount(&server)
            .await;

        let mut config = test_config();
        config.max_retries = 1;
        let err = ask(&client_for(&server, config)).await.unwrap_err();
        assert!(matches!(err, ModelError::MaxRetriesExceeded { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
            .mount(&server)
            .await;

        let err = ask(&client_for(&server, test_config())).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
