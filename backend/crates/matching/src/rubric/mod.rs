mod catalog;

use serde::Serialize;

use resolver_common::error::{ResolverError, ResolverResult};

use crate::entity::{EntityType, ScoringMethod};

/// How a rule treats a value that is null or missing on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leniency {
    Strict,
    NullLenient,
}

impl Leniency {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Strict => "A null or missing value on either side fails this rule.",
            Self::NullLenient => {
                "If the value is null or missing on either side, the rule passes."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldGate {
    pub field: &'static str,
    pub case_insensitive: bool,
}

/// Both sides non-null and different on any gated field scores 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prescreen {
    pub name: &'static str,
    pub gates: Vec<FieldGate>,
    pub points: f64,
}

/// Machine-checkable form of a rule's condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// A scalar field compared between source and candidate.
    Equals {
        field: &'static str,
        case_insensitive: bool,
    },
    /// Passes when any group shares at least one exact value. The paths
    /// inside a group are unioned before comparing.
    Overlap {
        groups: &'static [&'static [&'static str]],
    },
    /// Fixture home/away alignment: full points when aligned, `flipped_points`
    /// when home and away are swapped.
    TeamAlignment { flipped_points: f64 },
    /// Both results present and every side's scores identical.
    ResultMatch,
    /// Dates within `days` calendar days of each other, either direction.
    DateProximity { field: &'static str, days: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub name: &'static str,
    pub points: f64,
    pub condition: &'static str,
    pub leniency: Leniency,
    pub check: Check,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rubric {
    pub entity_type: EntityType,
    pub method: ScoringMethod,
    pub prescreen: Prescreen,
    pub rules: Vec<Rule>,
    pub max_score: f64,
    pub threshold: f64,
}

impl Rubric {
    /// Number shown for the rule at `index` in prompts and justifications.
    /// Weighted rubrics count the prescreen as rule 1.
    pub fn rule_number(&self, index: usize) -> usize {
        match self.method {
            ScoringMethod::Weighted => index + 2,
            ScoringMethod::Binary => self.prescreen.gates.len() + index + 1,
        }
    }

    pub fn point_ceiling(&self) -> f64 {
        self.prescreen.points + self.rules.iter().map(|r| r.points).sum::<f64>()
    }
}

pub fn get_rubric(entity_type: EntityType, method: ScoringMethod) -> Rubric {
    match (entity_type, method) {
        (EntityType::Team, ScoringMethod::Weighted) => catalog::team_weighted(),
        (EntityType::Team, ScoringMethod::Binary) => catalog::exact_checklist(EntityType::Team),
        (EntityType::Fixture, ScoringMethod::Weighted) => catalog::fixture_weighted(),
        // Fixtures reuse the team checklist unchanged; see DESIGN.md.
        (EntityType::Fixture, ScoringMethod::Binary) => {
            catalog::exact_checklist(EntityType::Fixture)
        }
    }
}

/// Unknown names are configuration errors.
pub fn rubric_for(entity_type: &str, method: &str) -> ResolverResult<Rubric> {
    let entity_type = entity_type
        .parse::<EntityType>()
        .map_err(ResolverError::Config)?;
    let method = method.parse::<ScoringMethod>().map_err(ResolverError::Config)?;
    Ok(get_rubric(entity_type, method))
}
