use serde_json::Value;

use crate::record::value_set;
use crate::trace::ScorerResult;

use super::{verdict, Scorer};

/// Passes when any path group shares at least one exact value.
pub struct OverlapScorer {
    pub name: &'static str,
    pub groups: &'static [&'static [&'static str]],
    pub lenient: bool,
    pub points: f64,
}

impl Scorer for OverlapScorer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult {
        let mut any_side_empty = true;

        for group in self.groups {
            let source_values = value_set(source, group);
            let candidate_values = value_set(candidate, group);
            if !source_values.is_empty() && !candidate_values.is_empty() {
                any_side_empty = false;
            }

            if let Some(shared) = source_values.intersection(&candidate_values).next() {
                return verdict(
                    self.name,
                    true,
                    self.points,
                    format!("shared {} value {shared:?}", group.join("/")),
                );
            }
        }

        if any_side_empty && self.lenient {
            return verdict(
                self.name,
                true,
                self.points,
                "no values on one side".to_string(),
            );
        }

        verdict(self.name, false, self.points, "no shared values".to_string())
    }
}
