use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use sqlx::{PgPool, Row};

use super::repositories::SourceIdRepository;
use resolver_common::error::{ResolverError, ResolverResult};

/// Plain or schema-qualified SQL identifier.
static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("table name pattern is valid")
});

/// Samples random ids from the `id` column of a table.
pub struct PgSourceIdRepository {
    pool: PgPool,
    table: String,
}

impl PgSourceIdRepository {
    /// The table name is interpolated into SQL, so it is checked here.
    pub fn new(pool: PgPool, table: &str) -> ResolverResult<Self> {
        let table = validate_table_name(table)?;
        Ok(Self { pool, table })
    }
}

pub fn validate_table_name(table: &str) -> ResolverResult<String> {
    let table = table.trim();
    if TABLE_NAME.is_match(table) {
        Ok(table.to_string())
    } else {
        Err(ResolverError::Validation(format!(
            "invalid table name: {table:?}"
        )))
    }
}

#[async_trait]
impl SourceIdRepository for PgSourceIdRepository {
    fn source_name(&self) -> String {
        format!("postgres:{}", self.table)
    }

    async fn fetch_ids(&self, limit: usize) -> ResolverResult<Vec<String>> {
        let sql = format!(
            "select id::text as id from {} order by random() limit $1",
            self.table
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ResolverError::Database(e.to_string()))?;

        let ids: Vec<String> = rows
            .into_iter()
            .filter_map(|row| row.get::<Option<String>, _>("id"))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        tracing::info!(source = %self.source_name(), count = ids.len(), "fetched source ids");
        Ok(ids)
    }
}
