use axum::extract::{Query, State};
use axum::Json;
use resolver_agent::process_one;
use resolver_common::error::ResolverError;
use resolver_matching::{parse_agent_output, select_best, MatchOutcome, OutcomeStatus};

use crate::error::ApiError;
use crate::matching::requests::{AuditRequest, MatchQuery};
use crate::matching::responses::AuditResponse;
use crate::AppState;

pub async fn match_entity(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<MatchOutcome>, ApiError> {
    let source_gsl_id = query
        .source_gsl_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ResolverError::Validation("source_gsl_id query parameter cannot be empty.".to_string())
        })?;

    let outcome = process_one(state.resolver.as_ref(), source_gsl_id).await;

    match outcome.status() {
        OutcomeStatus::Matched => Ok(Json(outcome)),
        OutcomeStatus::NoMatch => Err(ResolverError::NotFound(format!(
            "No match found for source GSL ID {source_gsl_id}."
        ))
        .into()),
        OutcomeStatus::DecodingError => Err(ResolverError::Agent(
            "Agent processing error: best match id could not be decoded".to_string(),
        )
        .into()),
        OutcomeStatus::ProcessingError => Err(ResolverError::Agent(format!(
            "Agent processing error: {}",
            outcome.score
        ))
        .into()),
    }
}

pub async fn audit_candidates(
    State(state): State<AppState>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<AuditResponse>, ApiError> {
    if !request.source.is_object() {
        return Err(ResolverError::Validation("source must be a JSON object".to_string()).into());
    }
    if let Some(index) = request.candidates.iter().position(|c| !c.is_object()) {
        return Err(
            ResolverError::Validation(format!("candidate {index} must be a JSON object")).into(),
        );
    }

    let rubric = state.rubric.as_ref();
    let selection = select_best(rubric, &request.source, &request.candidates);
    let answer = selection.render_answer(rubric);
    let parsed = parse_agent_output(&answer);

    Ok(Json(AuditResponse {
        rubric: format!("{}/{}", rubric.entity_type, rubric.method),
        selection,
        answer,
        parsed,
    }))
}
