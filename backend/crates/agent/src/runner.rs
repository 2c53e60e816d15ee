//! One source id in, one [`MatchOutcome`] out.

use std::sync::Arc;

use async_trait::async_trait;

use resolver_catalog::{CatalogClient, GraphqlCatalog};
use resolver_common::error::{ResolverError, ResolverResult};
use resolver_config::{CatalogConfig, LlmConfig};
use resolver_matching::{
    compose_system_prompt, compose_user_message, parse_agent_output, MatchOutcome, Rubric,
};

use crate::anthropic::AnthropicClient;
use crate::executor::AgentExecutor;
use crate::toolbox::ToolBox;

#[async_trait]
pub trait ResolveSource: Send + Sync {
    async fn resolve(&self, source_gsl_id: &str) -> ResolverResult<MatchOutcome>;
}

/// Agent-backed resolver: prompt, tools and model are fixed at construction.
#[derive(Clone)]
pub struct EntityResolver {
    executor: AgentExecutor,
}

impl EntityResolver {
    pub fn new(executor: AgentExecutor) -> Self {
        Self { executor }
    }

    /// Wire the production model and catalog clients for `rubric`.
    pub fn from_config(
        llm: &LlmConfig,
        catalog: &CatalogConfig,
        rubric: &Rubric,
    ) -> ResolverResult<Self> {
        let model = AnthropicClient::new(llm.clone())
            .map_err(|e| ResolverError::Config(format!("model client: {e}")))?;
        let catalog_client = CatalogClient::new(catalog.clone())
            .map_err(|e| ResolverError::Config(format!("catalog client: {e}")))?;
        let catalog = GraphqlCatalog::new(catalog_client, rubric.entity_type);
        let tools = ToolBox::new(Arc::new(catalog), rubric.entity_type);

        tracing::info!(
            model = %llm.model,
            entity_type = %rubric.entity_type,
            scoring_method = %rubric.method,
            max_iterations = llm.max_iterations,
            "agent configured"
        );

        Ok(Self::new(AgentExecutor::new(
            Arc::new(model),
            tools,
            compose_system_prompt(rubric),
            llm.max_iterations,
        )))
    }
}

#[async_trait]
impl ResolveSource for EntityResolver {
    async fn resolve(&self, source_gsl_id: &str) -> ResolverResult<MatchOutcome> {
        let answer = self
            .executor
            .run(&compose_user_message(source_gsl_id))
            .await
            .map_err(|e| ResolverError::Agent(e.to_string()))?;
        let parsed = parse_agent_output(&answer);
        Ok(MatchOutcome::from_answer(source_gsl_id, parsed))
    }
}

/// Resolve one id, turning any failure into a `processing error` outcome.
pub async fn process_one(resolver: &dyn ResolveSource, source_gsl_id: &str) -> MatchOutcome {
    tracing::info!(source_gsl_id, "processing source id");
    match resolver.resolve(source_gsl_id).await {
        Ok(outcome) => {
            tracing::info!(
                source_gsl_id,
                best_match = %outcome.best_match_gsl_id,
                score = %outcome.score,
                "source id resolved"
            );
            outcome
        }
        Err(e) => {
            tracing::error!(source_gsl_id, error = %e, "failed to process source id");
            MatchOutcome::processing_error(source_gsl_id, e)
        }
    }
}
