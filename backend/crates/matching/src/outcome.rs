use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::parser::{ParsedAnswer, DECODING_ERROR, NO_MATCH, PROCESSING_ERROR};

/// Result for one processed source id, as written to CSV rows and HTTP bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub source_gsl_id: String,
    pub best_match_gsl_id: String,
    pub score: String,
    pub justification: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Matched,
    NoMatch,
    DecodingError,
    ProcessingError,
}

impl MatchOutcome {
    pub fn from_answer(source_gsl_id: &str, answer: ParsedAnswer) -> Self {
        Self {
            source_gsl_id: source_gsl_id.to_string(),
            best_match_gsl_id: answer.best_match_id,
            score: answer.score,
            justification: answer.justification,
        }
    }

    /// The error text goes in the score column.
    pub fn processing_error(source_gsl_id: &str, error: impl Display) -> Self {
        Self {
            source_gsl_id: source_gsl_id.to_string(),
            best_match_gsl_id: PROCESSING_ERROR.to_string(),
            score: error.to_string(),
            justification: String::new(),
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        match self.best_match_gsl_id.as_str() {
            NO_MATCH => OutcomeStatus::NoMatch,
            DECODING_ERROR => OutcomeStatus::DecodingError,
            PROCESSING_ERROR => OutcomeStatus::ProcessingError,
            _ => OutcomeStatus::Matched,
        }
    }
}
