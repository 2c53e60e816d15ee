pub mod alignment;
pub mod attribute;
pub mod date;
pub mod overlap;
pub mod prescreen;
pub mod result;

use serde_json::Value;

use crate::rubric::{Check, Leniency, Rule};
use crate::trace::ScorerResult;

pub trait Scorer {
    fn name(&self) -> &'static str;
    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult;
}

/// Build the scorer that evaluates `rule`.
pub fn scorer_for(rule: &Rule) -> Box<dyn Scorer> {
    let lenient = rule.leniency == Leniency::NullLenient;
    match &rule.check {
        Check::Equals {
            field,
            case_insensitive,
        } => Box::new(attribute::AttributeScorer {
            name: rule.name,
            field: *field,
            case_insensitive: *case_insensitive,
            lenient,
            points: rule.points,
        }),
        Check::Overlap { groups } => Box::new(overlap::OverlapScorer {
            name: rule.name,
            groups: *groups,
            lenient,
            points: rule.points,
        }),
        Check::TeamAlignment { flipped_points } => Box::new(alignment::TeamAlignmentScorer {
            name: rule.name,
            points: rule.points,
            flipped_points: *flipped_points,
        }),
        Check::ResultMatch => Box::new(result::ResultMatchScorer {
            name: rule.name,
            points: rule.points,
        }),
        Check::DateProximity { field, days } => Box::new(date::DateProximityScorer {
            name: rule.name,
            field: *field,
            days: *days,
            points: rule.points,
        }),
    }
}

pub(crate) fn verdict(name: &str, passed: bool, points: f64, detail: String) -> ScorerResult {
    ScorerResult {
        rule: name.to_string(),
        passed,
        points: if passed { points } else { 0.0 },
        detail,
    }
}
