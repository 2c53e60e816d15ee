use serde_json::Value;

use crate::record::{object_at, scalar_at};
use crate::trace::ScorerResult;

use super::Scorer;

/// Fixture home/away alignment. Perfect alignment is checked first and
/// excludes the flipped outcome.
pub struct TeamAlignmentScorer {
    pub name: &'static str,
    pub points: f64,
    pub flipped_points: f64,
}

fn same_team(a: Option<&Value>, b: Option<&Value>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };

    if let (Some(a_id), Some(b_id)) = (scalar_at(a, "id"), scalar_at(b, "id")) {
        if a_id == b_id {
            return true;
        }
    }

    match (scalar_at(a, "name"), scalar_at(b, "name")) {
        (Some(a_name), Some(b_name)) => a_name.to_lowercase() == b_name.to_lowercase(),
        _ => false,
    }
}

impl Scorer for TeamAlignmentScorer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult {
        let source_home = object_at(source, "homeTeam");
        let source_away = object_at(source, "awayTeam");
        let candidate_home = object_at(candidate, "homeTeam");
        let candidate_away = object_at(candidate, "awayTeam");

        let (points, detail) = if same_team(source_home, candidate_home)
            && same_team(source_away, candidate_away)
        {
            (self.points, "home and away aligned")
        } else if same_team(source_home, candidate_away) && same_team(source_away, candidate_home)
        {
            (self.flipped_points, "home and away flipped")
        } else {
            (0.0, "teams do not align")
        };

        ScorerResult {
            rule: self.name.to_string(),
            passed: points > 0.0,
            points,
            detail: detail.to_string(),
        }
    }
}
