use serde_json::Value;

use crate::record::scalar_at;
use crate::rubric::FieldGate;
use crate::trace::ScorerResult;

use super::{verdict, Scorer};

/// One prescreen field. Only an explicit mismatch (both sides present and
/// different) fails; null on either side passes.
pub struct GateScorer {
    pub gate: FieldGate,
}

impl Scorer for GateScorer {
    fn name(&self) -> &'static str {
        self.gate.field
    }

    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult {
        let source_value = scalar_at(source, self.gate.field);
        let candidate_value = scalar_at(candidate, self.gate.field);

        let mismatch = match (&source_value, &candidate_value) {
            (Some(s), Some(c)) if self.gate.case_insensitive => s.to_lowercase() != c.to_lowercase(),
            (Some(s), Some(c)) => s != c,
            _ => false,
        };

        verdict(
            self.gate.field,
            !mismatch,
            0.0,
            format!(
                "{}: source={:?} candidate={:?}",
                self.gate.field, source_value, candidate_value
            ),
        )
    }
}
