//! The two catalog capabilities handed to the agent as tools.
//!
//! Neither method returns `Err`: the agent loop cannot recover from a raised
//! error, so failures become a structured `{"error": ...}` record for a
//! lookup and an empty list for a search.

use async_trait::async_trait;
use resolver_matching::codec::normalize_id;
use resolver_matching::record::record_id;
use resolver_matching::EntityType;
use serde_json::{json, Value};

use crate::client::{CatalogClient, CatalogError};
use crate::query::{lookup_query, search_query};

#[async_trait]
pub trait EntityCatalog: Send + Sync {
    /// Full record for one GSL id, or `{"error": ...}`.
    async fn fetch_entity(&self, gsl_id: &str) -> Value;

    /// Records matching `term`, never including the source itself.
    async fn search_entities(&self, source_gsl_id: &str, term: &str) -> Vec<Value>;
}

pub struct GraphqlCatalog {
    client: CatalogClient,
    entity_type: EntityType,
}

impl GraphqlCatalog {
    pub fn new(client: CatalogClient, entity_type: EntityType) -> Self {
        Self {
            client,
            entity_type,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }
}

fn lookup_error(gsl_id: &str, err: CatalogError) -> Value {
    match err {
        CatalogError::GraphqlErrors(details) => {
            json!({ "error": "GraphQL query failed.", "details": details })
        }
        CatalogError::MalformedResponse(reason) => json!({
            "error": "Failed to parse API response or find entity.",
            "details": reason,
        }),
        other => json!({ "error": format!("API call failed for {gsl_id}: {other}") }),
    }
}

#[async_trait]
impl EntityCatalog for GraphqlCatalog {
    async fn fetch_entity(&self, gsl_id: &str) -> Value {
        let query = lookup_query(self.entity_type, gsl_id);
        match self
            .client
            .items(self.entity_type.search_field(), &query)
            .await
        {
            Ok(items) => match items.into_iter().next() {
                Some(item) => item,
                None => json!({ "error": format!("No entity found with GSL ID {gsl_id}") }),
            },
            Err(e) => {
                tracing::warn!(gsl_id, error = %e, "catalog lookup failed");
                lookup_error(gsl_id, e)
            }
        }
    }

    async fn search_entities(&self, source_gsl_id: &str, term: &str) -> Vec<Value> {
        let query = search_query(self.entity_type, term);
        let items = match self
            .client
            .items(self.entity_type.search_field(), &query)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(source_gsl_id, term, error = %e, "catalog search failed");
                return Vec::new();
            }
        };

        // Source may arrive raw or encoded.
        let own_id = normalize_id(source_gsl_id);
        let before = items.len();
        let results: Vec<Value> = items
            .into_iter()
            .filter(|item| record_id(item).is_none_or(|id| normalize_id(&id) != own_id))
            .collect();

        tracing::debug!(
            source_gsl_id,
            term,
            found = before,
            returned = results.len(),
            "catalog search"
        );
        results
    }
}
