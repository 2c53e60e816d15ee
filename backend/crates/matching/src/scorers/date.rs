use chrono::NaiveDate;
use serde_json::Value;

use crate::record::scalar_at;
use crate::trace::ScorerResult;

use super::{verdict, Scorer};

/// Candidate date within `days` calendar days of the source date.
pub struct DateProximityScorer {
    pub name: &'static str,
    pub field: &'static str,
    pub days: i64,
    pub points: f64,
}

/// Calendar date of an ISO date or timestamp (`2024-05-01`, `2024-05-01T18:00:00Z`).
fn calendar_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl Scorer for DateProximityScorer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn score(&self, source: &Value, candidate: &Value) -> ScorerResult {
        let source_date = scalar_at(source, self.field).and_then(|d| calendar_date(&d));
        let candidate_date = scalar_at(candidate, self.field).and_then(|d| calendar_date(&d));

        match (source_date, candidate_date) {
            (Some(s), Some(c)) => {
                let gap = (c - s).num_days().abs();
                verdict(
                    self.name,
                    gap <= self.days,
                    self.points,
                    format!("source={s} candidate={c} gap_days={gap}"),
                )
            }
            _ => verdict(
                self.name,
                false,
                self.points,
                format!("{} missing or unparseable", self.field),
            ),
        }
    }
}
