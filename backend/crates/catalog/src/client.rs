use std::time::Duration;

use reqwest::{Client, StatusCode};
use resolver_config::CatalogConfig;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("GraphQL query failed: {0}")]
    GraphqlErrors(Value),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Bearer-authenticated GraphQL client for the sports catalog.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: point the client at a specific endpoint (e.g., wiremock).
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = endpoint.to_string();
        self
    }

    /// Run one query and return its `data` object.
    pub async fn execute(&self, query: &str) -> Result<Value, CatalogError> {
        let body = self.post_with_retry(query).await?;

        if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
            return Err(CatalogError::GraphqlErrors(errors.clone()));
        }

        body.get("data")
            .filter(|d| d.is_object())
            .cloned()
            .ok_or_else(|| CatalogError::MalformedResponse("missing data object".to_string()))
    }

    /// `data.<collection>.items` of a searchable collection query.
    pub async fn items(&self, collection: &str, query: &str) -> Result<Vec<Value>, CatalogError> {
        let data = self.execute(query).await?;
        match data.get(collection).and_then(|c| c.get("items")) {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(Value::Null) => Ok(Vec::new()),
            _ => Err(CatalogError::MalformedResponse(format!(
                "{collection}.items is not a list"
            ))),
        }
    }

    async fn post_with_retry(&self, query: &str) -> Result<Value, CatalogError> {
        let mut last_error = String::new();
        let payload = json!({ "query": query });

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff_secs = std::cmp::min(1u64 << attempt, 30);
                tracing::warn!(attempt, backoff_secs, "retrying catalog query after backoff");
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            }

            let response = match self
                .client
                .post(&self.config.endpoint)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() || e.is_connect() {
                        continue;
                    }
                    return Err(CatalogError::RequestError(e));
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response.text().await?;
                return serde_json::from_str(&text)
                    .map_err(|e| CatalogError::MalformedResponse(e.to_string()));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    let wait = std::cmp::min(retry_after, 60);
                    tracing::warn!(wait, "catalog rate-limited, waiting Retry-After");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
                last_error = "429 Too Many Requests".to_string();
                continue;
            }

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{status}: {body}");
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::HttpError { status, body });
        }

        Err(CatalogError::MaxRetriesExceeded {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> CatalogConfig {
        CatalogConfig {
            endpoint: "http://localhost/graphql".to_string(),
            api_key: "catalog-token".to_string(),
            max_retries: 2,
            timeout_secs: 5,
        }
    }

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(test_config())
            .unwrap()
            .with_endpoint(&format!("{}/graphql", server.uri()))
    }

    #[tokio::test]
    async fn returns_items_of_the_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer catalog-token"))
            .and(body_string_contains("searchableTeams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "searchableTeams": { "items": [{ "id": "a" }, { "id": "b" }] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .items("searchableTeams", "query { searchableTeams { items { id } } }")
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], "b");
    }

    #[tokio::test]
    async fn graphql_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "bad field" }]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).execute("query { x }").await.unwrap_err();
        match err {
            CatalogError::GraphqlErrors(errors) => assert_eq!(errors[0]["message"], "bad field"),
            other => panic!("expected GraphqlErrors, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).execute("query { x }").await.unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn retries_on_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "searchableTeams": { "items": [] } }
            })))
            .mount(&server)
            .await;

        let items = client_for(&server)
            .items("searchableTeams", "query { x }")
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn fails_fast_on_401() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).execute("query { x }").await.unwrap_err();
        match err {
            CatalogError::HttpError { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected HttpError, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn max_retries_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let mut config = test_config();
        config.max_retries = 1;
        let client = CatalogClient::new(config)
            .unwrap()
            .with_endpoint(&server.uri());

        let err = client.execute("query { x }").await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MaxRetriesExceeded { attempts: 2, .. }
        ));
    }
}
