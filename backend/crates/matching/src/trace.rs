use serde::{Deserialize, Serialize};

/// Outcome of one gate or rule for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerResult {
    pub rule: String,
    pub passed: bool,
    pub points: f64,
    pub detail: String,
}

/// Full evaluation of one candidate against one rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audit {
    /// Candidate id as found on the record (still encoded).
    pub candidate_id: Option<String>,
    pub prescreen_passed: bool,
    /// One entry per gated field, in gate order.
    pub gates: Vec<ScorerResult>,
    /// Empty when the prescreen failed; otherwise one entry per rule in
    /// canonical order.
    pub rules: Vec<ScorerResult>,
    pub total: f64,
}

impl Audit {
    pub fn all_rules_passed(&self) -> bool {
        self.prescreen_passed && !self.rules.is_empty() && self.rules.iter().all(|r| r.passed)
    }
}

/// Render points without a trailing `.0`.
pub fn format_points(points: f64) -> String {
    format!("{points}")
}

/// One justification line, e.g. `* Name Match (Rule 2): Pass, Score: 2`.
/// Binary checklists omit the score.
pub fn checklist_line(name: &str, number: usize, passed: bool, points: Option<f64>) -> String {
    let verdict = if passed { "Pass" } else { "Fail" };
    match points {
        Some(points) => format!(
            "* {name} (Rule {number}): {verdict}, Score: {}",
            format_points(points)
        ),
        None => format!("* {name} (Check {number}): {verdict}"),
    }
}
