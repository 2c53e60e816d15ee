use async_trait::async_trait;

use resolver_common::error::ResolverResult;

#[async_trait]
pub trait SourceIdRepository: Send + Sync {
    /// Short label for logs, e.g. `csv:ids.csv`.
    fn source_name(&self) -> String;

    /// Up to `limit` non-empty, trimmed source ids.
    async fn fetch_ids(&self, limit: usize) -> ResolverResult<Vec<String>>;
}
