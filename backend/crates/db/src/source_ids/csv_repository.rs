use std::path::PathBuf;

use async_trait::async_trait;

use super::repositories::SourceIdRepository;
use resolver_common::error::{ResolverError, ResolverResult};

/// Column holding the ids in the input file.
pub const ID_COLUMN: &str = "source_gsl_id";

/// Reads ids from the `source_gsl_id` column of a headered CSV file.
pub struct CsvSourceIdRepository {
    path: PathBuf,
}

impl CsvSourceIdRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_ids(&self, limit: usize) -> ResolverResult<Vec<String>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            ResolverError::Validation(format!("cannot open {}: {e}", self.path.display()))
        })?;

        let headers = reader
            .headers()
            .map_err(|e| ResolverError::Validation(format!("unreadable CSV header: {e}")))?;
        let column = headers
            .iter()
            .position(|h| h.trim() == ID_COLUMN)
            .ok_or_else(|| {
                ResolverError::Validation(format!(
                    "{} has no {ID_COLUMN} column",
                    self.path.display()
                ))
            })?;

        let mut ids = Vec::new();
        for record in reader.records() {
            if ids.len() >= limit {
                break;
            }
            let record = record
                .map_err(|e| ResolverError::Validation(format!("malformed CSV row: {e}")))?;
            match record.get(column).map(str::trim) {
                Some(id) if !id.is_empty() => ids.push(id.to_string()),
                _ => tracing::debug!("skipping blank source id"),
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl SourceIdRepository for CsvSourceIdRepository {
    fn source_name(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    async fn fetch_ids(&self, limit: usize) -> ResolverResult<Vec<String>> {
        let ids = self.read_ids(limit)?;
        tracing::info!(source = %self.source_name(), count = ids.len(), "fetched source ids");
        Ok(ids)
    }
}
