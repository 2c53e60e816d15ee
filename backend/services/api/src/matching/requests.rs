use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub source_gsl_id: Option<String>,
}

/// Records to run through the configured rubric without a model.
#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub source: Value,
    #[serde(default)]
    pub candidates: Vec<Value>,
}
