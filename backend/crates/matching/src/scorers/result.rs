use serde_json::Value;

use crate::record::object_at;
use crate::trace::ScorerResult;

use super::{verdict, Scorer};

const SIDES: [&str; 2] = ["homeTeam", "awayTeam"];
const SCORE_FIELDS: [&str; 2] = ["standardScore", "additionalScore"];

/// Both fixtures carry a result and every side's scores agree.
pub struct ResultMatchScorer {
    pub name: &'static str,
    pub points: f64,
}

fn scores_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(source: &Value, candidate: &Value) -> Result<(), String> {
    let source_result = object_at(source, "result").ok_or("source has no result")?;
    let candidate_result = object_at(candidate, "result").ok_or("candidate has no result")?;

    for side in SIDES {
        let (Some(s), Some(c)) = (
            object_at(source_result, side),
            object_at(candidate_result, side),
        ) else {
            return Err(format!("{side} result missing"));
        };
        for field in SCORE_FIELDS {
            let sv = s.get(field).unwrap_or(&Value::Null);
            let cv = c.get(field).unwrap_or(&Value::Null);
            if !scores_equal(sv, cv) {
                return Err(format!("{side}.{field}: source={sv} candidate={cv}"));
            }
        }
    }
    Ok(())
}

impl Scorer for ResultMatchScorer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult {
        match compare(source, candidate) {
            Ok(()) => verdict(self.name, true, self.points, "results identical".to_string()),
            Err(detail) => verdict(self.name, false, self.points, detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scorer() -> ResultMatchScorer {
        ResultMatchScorer {
            name: "Result Match",
            points: 1.0,
        }
    }

    fn with_result(home: (i64, i64), away: (i64, i64)) -> Value {
        json!({
            "result": {
                "homeTeam": { "standardScore": home.0, "additionalScore": home.1 },
                "awayTeam": { "standardScore": away.0, "additionalScore": away.1 }
            }
        })
    }

    #[test]
    fn identical_results_pass() {
        let result = scorer().score(&with_result((2, 0), (1, 0)), &with_result((2, 0), (1, 0)));
        assert!(result.passed);
        assert_eq!(result.points, 1.0);
    }

    #[test]
    fn integer_and_float_scores_compare_numerically() {
        let candidate = json!({
            "result": {
                "homeTeam": { "standardScore": 2.0, "additionalScore": 0 },
                "awayTeam": { "standardScore": 1, "additionalScore": 0.0 }
            }
        });
        assert!(scorer().score(&with_result((2, 0), (1, 0)), &candidate).passed);
    }

    #[test]
    fn any_differing_score_fails() {
        let result = scorer().score(&with_result((2, 0), (1, 0)), &with_result((2, 1), (1, 0)));
        assert!(!result.passed);
        assert!(result.detail.contains("homeTeam.additionalScore"));
    }

    #[test]
    fn null_result_fails() {
        let result = scorer().score(&json!({ "result": null }), &with_result((0, 0), (0, 0)));
        assert!(!result.passed);
        assert_eq!(result.detail, "source has no result");
    }
}
