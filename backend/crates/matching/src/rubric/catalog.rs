use crate::entity::{EntityType, ScoringMethod};

use super::{Check, FieldGate, Leniency, Prescreen, Rubric, Rule};

const WEIGHTED_MAX: f64 = 5.0;
const WEIGHTED_THRESHOLD: f64 = 2.0;

fn gate(field: &'static str) -> FieldGate {
    FieldGate {
        field,
        case_insensitive: false,
    }
}

fn gate_ci(field: &'static str) -> FieldGate {
    FieldGate {
        field,
        case_insensitive: true,
    }
}

pub(super) fn team_weighted() -> Rubric {
    Rubric {
        entity_type: EntityType::Team,
        method: ScoringMethod::Weighted,
        prescreen: Prescreen {
            name: "Core Attributes Match",
            gates: vec![gate("sport"), gate("gender")],
            points: 1.0,
        },
        rules: vec![
            Rule {
                name: "Name Match",
                points: 2.0,
                condition: "`name` must be an exact, case-insensitive match.",
                leniency: Leniency::Strict,
                check: Check::Equals {
                    field: "name",
                    case_insensitive: true,
                },
            },
            Rule {
                name: "Competition Overlap",
                points: 0.5,
                condition: "At least one `competitions.name` or `competitions.id` must be an exact match.",
                leniency: Leniency::Strict,
                check: Check::Overlap {
                    groups: &[&["competitions.name"], &["competitions.id"]],
                },
            },
            Rule {
                name: "Team Member Overlap",
                points: 0.5,
                condition: "At least one `teamMembers.individual.id` or `teamMembers.individual.commonName.fullName` must be an exact match.",
                leniency: Leniency::Strict,
                check: Check::Overlap {
                    groups: &[
                        &["teamMembers.individual.id"],
                        &["teamMembers.individual.commonName.fullName"],
                    ],
                },
            },
            Rule {
                name: "Region Match",
                points: 0.5,
                condition: "`regionName` must be an exact, case-insensitive match.",
                leniency: Leniency::NullLenient,
                check: Check::Equals {
                    field: "regionName",
                    case_insensitive: true,
                },
            },
            Rule {
                name: "Team Type Match",
                points: 0.5,
                condition: "`teamType` must be an exact match.",
                leniency: Leniency::NullLenient,
                check: Check::Equals {
                    field: "teamType",
                    case_insensitive: false,
                },
            },
        ],
        max_score: WEIGHTED_MAX,
        threshold: WEIGHTED_THRESHOLD,
    }
}

/// All-or-nothing checklist. Written against team fields; fixtures get the
/// very same checklist.
pub(super) fn exact_checklist(entity_type: EntityType) -> Rubric {
    Rubric {
        entity_type,
        method: ScoringMethod::Binary,
        prescreen: Prescreen {
            name: "Core Attributes Match",
            gates: vec![
                gate("sport"),
                gate("gender"),
                gate("teamType"),
                gate_ci("regionName"),
            ],
            points: 0.0,
        },
        rules: vec![
            Rule {
                name: "Name Match",
                points: 0.0,
                condition: "`name` must be an exact, case-insensitive match.",
                leniency: Leniency::Strict,
                check: Check::Equals {
                    field: "name",
                    case_insensitive: true,
                },
            },
            Rule {
                name: "Competition Overlap",
                points: 0.0,
                condition: "The list of `competitions.name` values must have at least one exact match.",
                leniency: Leniency::Strict,
                check: Check::Overlap {
                    groups: &[&["competitions.name"]],
                },
            },
            Rule {
                name: "Team Member Overlap",
                points: 0.0,
                condition: "The list of `teamMembers.preferredJersey` or `teamMembers.individual.id` or `teamMembers.individual.commonName.fullName` or `teamMembers.individual.commonName.givenName` or `teamMembers.individual.commonName.familyName` values must have at least one exact match.",
                leniency: Leniency::Strict,
                check: Check::Overlap {
                    groups: &[
                        &["teamMembers.preferredJersey"],
                        &["teamMembers.individual.id"],
                        &["teamMembers.individual.commonName.fullName"],
                        &["teamMembers.individual.commonName.givenName"],
                        &["teamMembers.individual.commonName.familyName"],
                    ],
                },
            },
        ],
        max_score: 1.0,
        threshold: 1.0,
    }
}

pub(super) fn fixture_weighted() -> Rubric {
    Rubric {
        entity_type: EntityType::Fixture,
        method: ScoringMethod::Weighted,
        prescreen: Prescreen {
            name: "Sport Match",
            gates: vec![gate("sport")],
            points: 1.0,
        },
        rules: vec![
            Rule {
                name: "Team Match",
                points: 1.5,
                condition: "Teams are the same when their `id` values match or their `name` values match case-insensitively. Award 1.5 if the source `homeTeam` matches the candidate `homeTeam` AND the source `awayTeam` matches the candidate `awayTeam`. Otherwise award 1 if the teams are flipped: the source `homeTeam` matches the candidate `awayTeam` AND the source `awayTeam` matches the candidate `homeTeam`. Otherwise award 0. Check the perfect alignment first; the two outcomes are mutually exclusive.",
                leniency: Leniency::Strict,
                check: Check::TeamAlignment {
                    flipped_points: 1.0,
                },
            },
            Rule {
                name: "Result Match",
                points: 1.0,
                condition: "Both fixtures must have a non-null `result`, and for `homeTeam` and `awayTeam` the `standardScore` and `additionalScore` values must all match.",
                leniency: Leniency::Strict,
                check: Check::ResultMatch,
            },
            Rule {
                name: "Date Proximity",
                points: 0.5,
                condition: "The candidate `date` must fall within one calendar day of the source `date`, before or after, inclusive.",
                leniency: Leniency::Strict,
                check: Check::DateProximity {
                    field: "date",
                    days: 1,
                },
            },
            Rule {
                name: "Competition Match",
                points: 0.5,
                condition: "The `competition.name` or `competition.id` values must share at least one exact match.",
                leniency: Leniency::Strict,
                check: Check::Overlap {
                    groups: &[&["competition.name"], &["competition.id"]],
                },
            },
            Rule {
                name: "Participant Overlap",
                points: 0.5,
                condition: "At least one individual id must appear on both fixtures, taking `participants.individual.id` and `rosters.participants.individual.id` together.",
                leniency: Leniency::Strict,
                check: Check::Overlap {
                    groups: &[&[
                        "participants.individual.id",
                        "rosters.participants.individual.id",
                    ]],
                },
            },
        ],
        max_score: WEIGHTED_MAX,
        threshold: WEIGHTED_THRESHOLD,
    }
}
