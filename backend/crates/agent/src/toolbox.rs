use std::sync::Arc;

use serde_json::{json, Value};

use resolver_catalog::EntityCatalog;
use resolver_matching::arithmetic::add_multiple_numbers;
use resolver_matching::codec::decode_gsl_id;
use resolver_matching::tools::{
    agent_tools, ToolSpec, ADD_NUMBERS_TOOL, DECODE_ID_TOOL, FETCH_ENTITY_TOOL,
    SEARCH_ENTITIES_TOOL,
};
use resolver_matching::EntityType;

/// What goes back to the model as a tool result.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(value: &Value) -> Self {
        Self {
            content: value.to_string(),
            is_error: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            content: json!({ "error": message.into() }).to_string(),
            is_error: true,
        }
    }
}

/// Routes tool calls to the catalog, the id codec and the arithmetic tool.
/// Nothing here returns an error to the caller; every failure becomes an
/// `{"error": ...}` result the model can read.
#[derive(Clone)]
pub struct ToolBox {
    catalog: Arc<dyn EntityCatalog>,
    specs: Vec<ToolSpec>,
}

fn string_arg<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolOutput> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolOutput::error(format!("missing string argument `{key}`")))
}

impl ToolBox {
    pub fn new(catalog: Arc<dyn EntityCatalog>, entity_type: EntityType) -> Self {
        Self {
            catalog,
            specs: agent_tools(entity_type),
        }
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub async fn dispatch(&self, name: &str, input: &Value) -> ToolOutput {
        match self.call(name, input).await {
            Ok(output) | Err(output) => output,
        }
    }

    async fn call(&self, name: &str, input: &Value) -> Result<ToolOutput, ToolOutput> {
        match name {
            FETCH_ENTITY_TOOL => {
                let gsl_id = string_arg(input, "gsl_id")?;
                let record = self.catalog.fetch_entity(gsl_id).await;
                if record.get("error").is_some() {
                    Ok(ToolOutput {
                        content: record.to_string(),
                        is_error: true,
                    })
                } else {
                    Ok(ToolOutput::ok(&record))
                }
            }
            SEARCH_ENTITIES_TOOL => {
                let source_gsl_id = string_arg(input, "source_gsl_id")?;
                let term = string_arg(input, "search_term")?;
                let results = self.catalog.search_entities(source_gsl_id, term).await;
                Ok(ToolOutput::ok(&Value::Array(results)))
            }
            DECODE_ID_TOOL => {
                let encoded = string_arg(input, "encoded_id")?;
                let decoded = decode_gsl_id(encoded).unwrap_or_else(|e| {
                    tracing::warn!(encoded, error = %e, "could not decode id for the agent");
                    String::new()
                });
                Ok(ToolOutput::ok(&Value::String(decoded)))
            }
            ADD_NUMBERS_TOOL => Ok(ToolOutput::ok(&json!(add_multiple_numbers(input)))),
            other => {
                tracing::warn!(tool = other, "model called an unknown tool");
                Err(ToolOutput::error(format!("unknown tool: {other}")))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use resolver_matching::codec::encode_gsl_id;

    /// Catalog holding a fixed set of records keyed by raw id.
    pub(crate) struct MockCatalog {
        pub records: Vec<(String, Value)>,
    }

    #[async_trait]
    impl EntityCatalog for MockCatalog {
        async fn fetch_entity(&self, gsl_id: &str) -> Value {
            self.records
                .iter()
                .find(|(id, _)| id == gsl_id)
                .map(|(_, record)| record.clone())
                .unwrap_or_else(|| json!({ "error": format!("No entity found with GSL ID {gsl_id}") }))
        }

        async fn search_entities(&self, source_gsl_id: &str, _term: &str) -> Vec<Value> {
            self.records
                .iter()
                .filter(|(id, _)| id != source_gsl_id)
                .map(|(_, record)| record.clone())
                .collect()
        }
    }

    fn toolbox() -> ToolBox {
        let catalog = MockCatalog {
            records: vec![
                ("1".into(), json!({ "id": encode_gsl_id(EntityType::Team, "1"), "name": "A" })),
                ("2".into(), json!({ "id": encode_gsl_id(EntityType::Team, "2"), "name": "B" })),
            ],
        };
        ToolBox::new(Arc::new(catalog), EntityType::Team)
    }

    fn parsed(output: &ToolOutput) -> Value {
        serde_json::from_str(&output.content).unwrap()
    }

    #[tokio::test]
    async fn fetch_routes_to_catalog() {
        let out = toolbox()
            .dispatch(FETCH_ENTITY_TOOL, &json!({ "gsl_id": "1" }))
            .await;
        assert!(!out.is_error);
        assert_eq!(parsed(&out)["name"], "A");
    }

    #[tokio::test]
    async fn fetch_miss_is_flagged_as_error() {
        let out = toolbox()
            .dispatch(FETCH_ENTITY_TOOL, &json!({ "gsl_id": "9" }))
            .await;
        assert!(out.is_error);
        assert!(parsed(&out)["error"].as_str().unwrap().contains("9"));
    }

    #[tokio::test]
    async fn search_returns_a_list() {
        let out = toolbox()
            .dispatch(
                SEARCH_ENTITIES_TOOL,
                &json!({ "source_gsl_id": "1", "search_term": "A" }),
            )
            .await;
        let list = parsed(&out);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["name"], "B");
    }

    #[tokio::test]
    async fn decode_returns_empty_string_on_garbage() {
        let tools = toolbox();
        let good = tools
            .dispatch(
                DECODE_ID_TOOL,
                &json!({ "encoded_id": encode_gsl_id(EntityType::Team, "77") }),
            )
            .await;
        assert_eq!(parsed(&good), json!("GSLSearchableTeam77"));

        let bad = tools
            .dispatch(DECODE_ID_TOOL, &json!({ "encoded_id": "%%%" }))
            .await;
        assert!(!bad.is_error);
        assert_eq!(parsed(&bad), json!(""));
    }

    #[tokio::test]
    async fn add_numbers_sums_fractions() {
        let out = toolbox()
            .dispatch(ADD_NUMBERS_TOOL, &json!({ "numbers": [1, 2, 0.5, 0.5, 0.5, 0.5] }))
            .await;
        assert_eq!(parsed(&out).as_f64(), Some(5.0));
    }

    #[tokio::test]
    async fn unknown_tool_and_bad_input_become_error_results() {
        let tools = toolbox();
        let unknown = tools.dispatch("web_search", &json!({})).await;
        assert!(unknown.is_error);
        assert_eq!(parsed(&unknown)["error"], "unknown tool: web_search");

        let missing = tools.dispatch(FETCH_ENTITY_TOOL, &json!({ "id": 3 })).await;
        assert!(missing.is_error);
        assert_eq!(parsed(&missing)["error"], "missing string argument `gsl_id`");
    }

    #[test]
    fn specs_match_declared_tools() {
        assert_eq!(toolbox().specs().len(), 4);
    }
}
