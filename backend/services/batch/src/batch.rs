use std::io::Write;

use resolver_agent::{process_one, ResolveSource};
use resolver_common::error::{ResolverError, ResolverResult};
use resolver_matching::OutcomeStatus;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub matched: usize,
    pub no_match: usize,
    pub errors: usize,
}

/// Resolve `ids` one after another, writing and flushing one row per id.
/// A failing id becomes a `processing error` row and the batch continues;
/// only a failure to write the output stops it.
pub async fn run_batch<W: Write>(
    resolver: &dyn ResolveSource,
    ids: &[String],
    writer: &mut csv::Writer<W>,
) -> ResolverResult<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (index, raw_id) in ids.iter().enumerate() {
        let source_gsl_id = raw_id.trim();
        if source_gsl_id.is_empty() {
            tracing::debug!(index, "skipping blank source id");
            continue;
        }

        tracing::info!(
            progress = format!("{}/{}", index + 1, ids.len()),
            source_gsl_id,
            "batch item"
        );
        let outcome = process_one(resolver, source_gsl_id).await;

        match outcome.status() {
            OutcomeStatus::Matched => summary.matched += 1,
            OutcomeStatus::NoMatch => summary.no_match += 1,
            OutcomeStatus::DecodingError | OutcomeStatus::ProcessingError => summary.errors += 1,
        }
        summary.processed += 1;

        writer
            .serialize(&outcome)
            .map_err(|e| ResolverError::Internal(format!("failed to write row: {e}")))?;
        writer
            .flush()
            .map_err(|e| ResolverError::Internal(format!("failed to flush output: {e}")))?;
    }

    Ok(summary)
}
