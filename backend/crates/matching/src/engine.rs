use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::arithmetic;
use crate::codec::normalize_id;
use crate::entity::ScoringMethod;
use crate::parser::{BEST_MATCH_LABEL, JUSTIFICATION_LABEL, NO_MATCH, SCORE_LABEL};
use crate::record::record_id;
use crate::rubric::Rubric;
use crate::scorers::prescreen::GateScorer;
use crate::scorers::{scorer_for, Scorer};
use crate::trace::{checklist_line, format_points, Audit, ScorerResult};

/// Evaluate one candidate. Rules run only when the prescreen passes.
pub fn audit(rubric: &Rubric, source: &Value, candidate: &Value) -> Audit {
    let gates: Vec<ScorerResult> = rubric
        .prescreen
        .gates
        .iter()
        .map(|gate| GateScorer { gate: *gate }.score(source, candidate))
        .collect();
    let prescreen_passed = gates.iter().all(|g| g.passed);

    if !prescreen_passed {
        return Audit {
            candidate_id: record_id(candidate),
            prescreen_passed,
            gates,
            rules: Vec::new(),
            total: 0.0,
        };
    }

    let rules: Vec<ScorerResult> = rubric
        .rules
        .iter()
        .map(|rule| scorer_for(rule).score(source, candidate))
        .collect();

    let total = match rubric.method {
        ScoringMethod::Weighted => {
            let mut points = vec![rubric.prescreen.points];
            points.extend(rules.iter().map(|r| r.points));
            arithmetic::sum(&points)
        }
        ScoringMethod::Binary => {
            if rules.iter().all(|r| r.passed) {
                1.0
            } else {
                0.0
            }
        }
    };

    Audit {
        candidate_id: record_id(candidate),
        prescreen_passed,
        gates,
        rules,
        total,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub winner: Option<Audit>,
    /// Ignores the threshold.
    pub best_attempt: Option<Audit>,
    pub audits: Vec<Audit>,
    /// Candidates dropped because they were the source itself.
    pub excluded_self: usize,
}

/// Weighted: highest total, first wins ties, reported only at or above the
/// threshold. Binary: first candidate passing every check.
pub fn select_best(rubric: &Rubric, source: &Value, candidates: &[Value]) -> Selection {
    let source_id = record_id(source).map(|id| normalize_id(&id));
    let mut seen = HashSet::new();
    let mut excluded_self = 0;
    let mut audits = Vec::new();

    for candidate in candidates {
        let Some(candidate_id) = record_id(candidate) else {
            tracing::warn!("skipping candidate without an id");
            continue;
        };
        let normalized = normalize_id(&candidate_id);
        if source_id.as_deref() == Some(normalized.as_str()) {
            excluded_self += 1;
            continue;
        }
        if !seen.insert(normalized) {
            continue;
        }
        audits.push(audit(rubric, source, candidate));
    }

    let (winner, best_attempt) = match rubric.method {
        ScoringMethod::Weighted => {
            let mut best: Option<&Audit> = None;
            for a in &audits {
                if best.is_none_or(|b| a.total > b.total) {
                    best = Some(a);
                }
            }
            let winner = best.filter(|b| b.total >= rubric.threshold).cloned();
            (winner, best.cloned())
        }
        ScoringMethod::Binary => {
            let winner = audits.iter().find(|a| a.all_rules_passed()).cloned();
            (winner.clone(), winner)
        }
    };

    Selection {
        winner,
        best_attempt,
        audits,
        excluded_self,
    }
}

/// Justification checklist for one audit, in canonical rule order.
pub fn justification(rubric: &Rubric, audit: &Audit) -> String {
    let mut lines = Vec::new();

    match rubric.method {
        ScoringMethod::Weighted => {
            let gate_points = if audit.prescreen_passed {
                rubric.prescreen.points
            } else {
                0.0
            };
            lines.push(checklist_line(
                rubric.prescreen.name,
                1,
                audit.prescreen_passed,
                Some(gate_points),
            ));
            for (index, result) in audit.rules.iter().enumerate() {
                lines.push(checklist_line(
                    &result.rule,
                    rubric.rule_number(index),
                    result.passed,
                    Some(result.points),
                ));
            }
        }
        ScoringMethod::Binary => {
            for (index, gate) in audit.gates.iter().enumerate() {
                lines.push(checklist_line(
                    &format!("`{}` Match", gate.rule),
                    index + 1,
                    gate.passed,
                    None,
                ));
            }
            for (index, result) in audit.rules.iter().enumerate() {
                lines.push(checklist_line(
                    &result.rule,
                    rubric.rule_number(index),
                    result.passed,
                    None,
                ));
            }
        }
    }

    if !audit.prescreen_passed {
        lines.push("* Remaining rules not evaluated: disqualified by the prescreen.".to_string());
    }

    lines.join("\n")
}

impl Selection {
    /// Same answer format the agent is asked to produce.
    pub fn render_answer(&self, rubric: &Rubric) -> String {
        match (&self.winner, rubric.method) {
            (Some(winner), ScoringMethod::Weighted) => format!(
                "{BEST_MATCH_LABEL} {}\n\n{SCORE_LABEL} {}\n\n{JUSTIFICATION_LABEL}\n{}",
                winner.candidate_id.as_deref().unwrap_or_default(),
                format_points(winner.total),
                justification(rubric, winner)
            ),
            (None, ScoringMethod::Weighted) => {
                let attempt = match &self.best_attempt {
                    Some(best) => format!(
                        "The audit for the best attempt was:\n{}",
                        justification(rubric, best)
                    ),
                    None => "No candidates were found.".to_string(),
                };
                format!(
                    "{BEST_MATCH_LABEL} {NO_MATCH}\n\n{SCORE_LABEL} 0\n\n{JUSTIFICATION_LABEL} No candidate met the minimum score threshold of {}. {attempt}",
                    format_points(rubric.threshold)
                )
            }
            (Some(winner), ScoringMethod::Binary) => format!(
                "{BEST_MATCH_LABEL} {}\n\n{SCORE_LABEL} 1\n\n{JUSTIFICATION_LABEL} The candidate passed all conditions of the Exact Match Checklist.",
                winner.candidate_id.as_deref().unwrap_or_default()
            ),
            (None, ScoringMethod::Binary) => format!(
                "{BEST_MATCH_LABEL} {NO_MATCH}\n\n{SCORE_LABEL} 0\n\n{JUSTIFICATION_LABEL} No candidate passed all conditions of the strict Exact Match Checklist."
            ),
        }
    }
}
