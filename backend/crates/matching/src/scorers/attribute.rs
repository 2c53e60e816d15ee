use serde_json::Value;

use crate::record::scalar_at;
use crate::trace::ScorerResult;

use super::{verdict, Scorer};

/// Compares one scalar field between source and candidate.
pub struct AttributeScorer {
    pub name: &'static str,
    pub field: &'static str,
    pub case_insensitive: bool,
    pub lenient: bool,
    pub points: f64,
}

impl Scorer for AttributeScorer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult {
        let source_value = scalar_at(source, self.field);
        let candidate_value = scalar_at(candidate, self.field);

        let passed = match (&source_value, &candidate_value) {
            (Some(s), Some(c)) if self.case_insensitive => s.to_lowercase() == c.to_lowercase(),
            (Some(s), Some(c)) => s == c,
            _ => self.lenient,
        };

        verdict(
            self.name,
            passed,
            self.points,
            format!(
                "{}: source={:?} candidate={:?}",
                self.field, source_value, candidate_value
            ),
        )
    }
}
