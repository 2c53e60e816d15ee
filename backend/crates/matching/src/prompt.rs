use std::fmt::Write as _;

use crate::entity::{EntityType, ScoringMethod};
use crate::parser::{BEST_MATCH_LABEL, JUSTIFICATION_LABEL, NO_MATCH, SCORE_LABEL};
use crate::rubric::{FieldGate, Rubric};
use crate::tools::{ADD_NUMBERS_TOOL, FETCH_ENTITY_TOOL, SEARCH_ENTITIES_TOOL};
use crate::trace::{checklist_line, format_points};

/// Per-id instruction sent as the user turn.
pub fn compose_user_message(source_gsl_id: &str) -> String {
    format!(
        "Please research and compare the entity with GSL ID {source_gsl_id} to find the best merge candidate. Follow your instructions precisely."
    )
}

/// Full system prompt for one rubric. Deterministic for a given rubric.
pub fn compose_system_prompt(rubric: &Rubric) -> String {
    let mut out = String::new();
    out.push_str(&role(rubric.method));
    out.push_str("\n\n");
    out.push_str(&directives(rubric.method));
    out.push_str("\n---\n\n");
    out.push_str(&protocol(rubric));
    out.push_str("\n---\n\n");
    match rubric.method {
        ScoringMethod::Weighted => out.push_str(&weighted_rubric(rubric)),
        ScoringMethod::Binary => out.push_str(&binary_checklist(rubric)),
    }
    out.push_str("\n---\n\n");
    match rubric.method {
        ScoringMethod::Weighted => out.push_str(&weighted_format(rubric)),
        ScoringMethod::Binary => out.push_str(&binary_format()),
    }
    out
}

fn role(method: ScoringMethod) -> String {
    let persona = match method {
        ScoringMethod::Weighted => {
            "You are the Zero-Tolerance Validator (ZTV), a data validation automaton."
        }
        ScoringMethod::Binary => "You are a deterministic data processing bot.",
    };
    format!(
        "{persona} Your only function is to execute the following instructions with absolute precision. You do not interpret, infer, or deviate. You follow the protocol exactly as written."
    )
}

fn directives(method: ScoringMethod) -> String {
    let mut out = String::from("**Your Non-Negotiable Directives:**\n");
    out.push_str(
        "1.  **NO SELF-MATCHING:** You are forbidden from considering the source entity as a merge candidate. Remove the source entity from every candidate list before auditing, even if the search tool appears to have excluded it already.\n",
    );
    out.push_str(
        "2.  **LITERAL DATA ONLY:** You must work exclusively with the data provided by the tools. A null or missing field fails any check requiring it, unless the rule explicitly says missing values pass.\n",
    );
    match method {
        ScoringMethod::Weighted => {
            out.push_str(
                "3.  **PROTOCOL IS LAW:** The \"Strict Execution Protocol\" and \"Mandatory Scoring Rubric\" are an exact algorithm you must follow.\n",
            );
            let _ = writeln!(
                out,
                "4.  **DELEGATE CALCULATIONS:** To calculate the total score, you **MUST** use the `{ADD_NUMBERS_TOOL}` tool. Never add points yourself."
            );
        }
        ScoringMethod::Binary => {
            out.push_str(
                "3.  **BINARY LOGIC ONLY:** Your analysis is based entirely on the \"Mandatory Exact Match Checklist\" below. A candidate is either a 100% match or a 0% match. There is no partial credit.\n",
            );
        }
    }
    out
}

fn search_hints(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Team => "the team name, a key competition name, a key team member's name",
        EntityType::Fixture => "the home and away team names, the competition name",
    }
}

fn protocol(rubric: &Rubric) -> String {
    let mut out = String::from("### Strict Execution Protocol\n");
    let _ = writeln!(
        out,
        "1.  **Fetch Source:** Get the source {} data via `{FETCH_ENTITY_TOOL}`.",
        rubric.entity_type
    );
    let _ = writeln!(
        out,
        "2.  **Find Candidates:** Get potential candidates via `{SEARCH_ENTITIES_TOOL}`, searching with several terms ({}). Combine the results into one list of unique candidates.",
        search_hints(rubric.entity_type)
    );
    out.push_str("3.  **Filter Self:** Immediately remove the source entity from the candidate list.\n");
    match rubric.method {
        ScoringMethod::Weighted => {
            out.push_str(
                "4.  **Audit Each Candidate:** For every remaining candidate, meticulously apply the **Mandatory Scoring Rubric** below.\n",
            );
            out.push_str(
                "5.  **Identify Winner:** Determine the candidate with the highest score. If several candidates share the highest score, keep the one audited first.\n",
            );
            out.push_str(
                "6.  **Construct Final Report:** Follow the \"Final Answer Formatting\" instructions precisely.\n",
            );
        }
        ScoringMethod::Binary => {
            out.push_str(
                "4.  **Audit Each Candidate:** For every remaining candidate, check if it passes **ALL** conditions in the **Mandatory Exact Match Checklist**.\n",
            );
            out.push_str(
                "5.  **Identify First Valid Match:** The first candidate that passes all checks is the winner. Stop auditing further candidates.\n",
            );
            out.push_str(
                "6.  **Construct Final Report:** Follow the \"Final Answer Formatting\" instructions precisely.\n",
            );
        }
    }
    out
}

fn gate_condition(gate: &FieldGate) -> String {
    if gate.case_insensitive {
        format!("`{}` must be an exact, case-insensitive match.", gate.field)
    } else {
        format!("`{}` must be an exact match.", gate.field)
    }
}

const GATE_LENIENCY: &str =
    "A mismatch only counts when both values are present and different. If the value is null or missing on either side, the field does not disqualify.";

fn weighted_rubric(rubric: &Rubric) -> String {
    let mut out = String::from("### Mandatory Scoring Rubric\n");
    out.push_str("For each candidate, you will calculate a score by summing points from the rules below.\n\n");
    out.push_str(
        "**You MUST evaluate Rule 1 first.** If a candidate **fails Rule 1**, it is **immediately disqualified with a total score of 0**. Do not evaluate the other rules for that candidate.\n\n",
    );

    let prescreen = &rubric.prescreen;
    let fields: Vec<String> = prescreen.gates.iter().map(|g| format!("`{}`", g.field)).collect();
    let _ = writeln!(out, "* **RULE 1: {} (Prerequisite)**", prescreen.name);
    let _ = writeln!(out, "    * `FIELDS`: {}", fields.join(", "));
    let _ = writeln!(out, "    * `CONDITION`: Every field must be an exact match. {GATE_LENIENCY}");
    let _ = writeln!(out, "    * `POINTS`: {}\n", format_points(prescreen.points));

    for (index, rule) in rubric.rules.iter().enumerate() {
        let _ = writeln!(
            out,
            "* **RULE {}: {}**",
            rubric.rule_number(index),
            rule.name
        );
        let _ = writeln!(out, "    * `CONDITION`: {}", rule.condition);
        let _ = writeln!(out, "    * `MISSING DATA`: {}", rule.leniency.describe());
        let _ = writeln!(out, "    * `POINTS`: {}\n", format_points(rule.points));
    }

    let mut parts = vec![format_points(prescreen.points)];
    parts.extend(rubric.rules.iter().map(|r| format_points(r.points)));
    let _ = writeln!(
        out,
        "*(The total maximum score is {0}: {1} = {0} points)*",
        format_points(rubric.max_score),
        parts.join(" + ")
    );
    out
}

fn binary_checklist(rubric: &Rubric) -> String {
    let mut out = String::from("### Mandatory Exact Match Checklist\n");
    out.push_str(
        "A candidate is a valid merge candidate **if and only if ALL** of the following conditions are true when compared to the source entity:\n",
    );
    for (index, gate) in rubric.prescreen.gates.iter().enumerate() {
        let _ = writeln!(out, "{}.  {} {GATE_LENIENCY}", index + 1, gate_condition(gate));
    }
    for (index, rule) in rubric.rules.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}.  {} {}",
            rubric.rule_number(index),
            rule.condition,
            rule.leniency.describe()
        );
    }
    out
}

fn example_checklist(rubric: &Rubric) -> String {
    let mut lines = vec![format!(
        "> {}",
        checklist_line(rubric.prescreen.name, 1, true, Some(rubric.prescreen.points))
    )];
    for (index, rule) in rubric.rules.iter().enumerate() {
        lines.push(format!(
            "> {}",
            checklist_line(rule.name, rubric.rule_number(index), true, Some(rule.points))
        ));
    }
    lines.join("\n")
}

fn weighted_format(rubric: &Rubric) -> String {
    let threshold = format_points(rubric.threshold);
    let mut out = String::from("### Final Answer Formatting\n");
    out.push_str("To construct your final answer, you will perform these three steps **in order**:\n\n");
    out.push_str(
        "1.  **First, write the Justification:** Generate the detailed audit checklist for the winning candidate, explicitly stating the result and points for each rule that was evaluated, in rule order.\n",
    );
    let _ = writeln!(
        out,
        "2.  **Second, Calculate the Total Score via Tool:** Extract the individual points awarded from the Justification and call the `{ADD_NUMBERS_TOOL}` tool with that list. The result returned by the tool is your total score."
    );
    out.push_str("3.  **Third, assemble the final output** using the pieces you have prepared.\n\n");

    let _ = writeln!(out, "- If the highest score is {threshold} or more:");
    let _ = writeln!(out, "> {BEST_MATCH_LABEL} [The id of the best match]\n>");
    let _ = writeln!(out, "> {SCORE_LABEL} [Result from the {ADD_NUMBERS_TOOL} tool]\n>");
    let _ = writeln!(out, "> {JUSTIFICATION_LABEL}");
    let _ = writeln!(out, "{}\n", example_checklist(rubric));

    let _ = writeln!(out, "- If no candidate scores {threshold} or more:");
    let _ = writeln!(out, "> {BEST_MATCH_LABEL} {NO_MATCH}\n>");
    let _ = writeln!(out, "> {SCORE_LABEL} 0\n>");
    let _ = writeln!(
        out,
        "> {JUSTIFICATION_LABEL} No candidate met the minimum score threshold of {threshold}. The audit for the best attempt was: [Provide the checklist for the highest-scoring candidate]"
    );
    out
}

fn binary_format() -> String {
    let mut out = String::from("### Final Answer Formatting\n");
    out.push_str("Your final answer MUST be in the following format.\n\n");
    out.push_str("- If a candidate passes the Exact Match Checklist:\n");
    let _ = writeln!(out, "> {BEST_MATCH_LABEL} [The id of the valid match]\n>");
    let _ = writeln!(out, "> {SCORE_LABEL} 1\n>");
    let _ = writeln!(
        out,
        "> {JUSTIFICATION_LABEL} The candidate passed all conditions of the Exact Match Checklist.\n"
    );
    out.push_str("- If NO candidates pass the Exact Match Checklist:\n");
    let _ = writeln!(out, "> {BEST_MATCH_LABEL} {NO_MATCH}\n>");
    let _ = writeln!(out, "> {SCORE_LABEL} 0\n>");
    let _ = writeln!(
        out,
        "> {JUSTIFICATION_LABEL} No candidate passed all conditions of the strict Exact Match Checklist."
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_agent_output;
    use crate::rubric::get_rubric;

    fn prompt(entity: EntityType, method: ScoringMethod) -> String {
        compose_system_prompt(&get_rubric(entity, method))
    }

    #[test]
    fn user_message_names_the_source_id() {
        assert_eq!(
            compose_user_message("12345"),
            "Please research and compare the entity with GSL ID 12345 to find the best merge candidate. Follow your instructions precisely."
        );
    }

    #[test]
    fn every_prompt_carries_the_output_contract() {
        for entity in [EntityType::Team, EntityType::Fixture] {
            for method in [ScoringMethod::Weighted, ScoringMethod::Binary] {
                let text = prompt(entity, method);
                assert!(text.contains(BEST_MATCH_LABEL), "{entity}/{method}");
                assert!(text.contains(SCORE_LABEL), "{entity}/{method}");
                assert!(text.contains(JUSTIFICATION_LABEL), "{entity}/{method}");
                assert!(text.contains(NO_MATCH), "{entity}/{method}");
                assert!(text.contains("NO SELF-MATCHING"), "{entity}/{method}");
                assert!(text.contains(FETCH_ENTITY_TOOL));
                assert!(text.contains(SEARCH_ENTITIES_TOOL));
            }
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let rubric = get_rubric(EntityType::Fixture, ScoringMethod::Weighted);
        assert_eq!(compose_system_prompt(&rubric), compose_system_prompt(&rubric));
    }

    #[test]
    fn weighted_prompt_mandates_the_sum_tool_and_lists_rules_in_order() {
        let text = prompt(EntityType::Team, ScoringMethod::Weighted);
        assert!(text.contains("you **MUST** use the `add_multiple_numbers` tool"));
        let positions: Vec<usize> = [
            "RULE 1: Core Attributes Match",
            "RULE 2: Name Match",
            "RULE 3: Competition Overlap",
            "RULE 4: Team Member Overlap",
            "RULE 5: Region Match",
            "RULE 6: Team Type Match",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("1 + 2 + 0.5 + 0.5 + 0.5 + 0.5 = 5 points"));
        assert!(text.contains("threshold of 2"));
    }

    #[test]
    fn fixture_prompt_describes_team_alignment() {
        let text = prompt(EntityType::Fixture, ScoringMethod::Weighted);
        assert!(text.contains("RULE 1: Sport Match"));
        assert!(text.contains("RULE 2: Team Match"));
        assert!(text.contains("`POINTS`: 1.5"));
        assert!(text.contains("flipped"));
        assert!(text.contains("1 + 1.5 + 1 + 0.5 + 0.5 + 0.5 = 5 points"));
    }

    #[test]
    fn binary_prompt_has_no_partial_credit_or_sum_mandate() {
        let text = prompt(EntityType::Team, ScoringMethod::Binary);
        assert!(text.contains("There is no partial credit"));
        assert!(!text.contains("DELEGATE CALCULATIONS"));
        assert!(text.contains("1.  `sport` must be an exact match."));
        assert!(text.contains("4.  `regionName` must be an exact, case-insensitive match."));
        assert!(text.contains("7.  The list of `teamMembers.preferredJersey`"));
    }

    #[test]
    fn template_examples_parse_to_sentinels() {
        // The literal no-match example in the template must parse cleanly.
        let example = format!("{BEST_MATCH_LABEL} {NO_MATCH}\n{SCORE_LABEL} 0\n{JUSTIFICATION_LABEL} none");
        let parsed = parse_agent_output(&example);
        assert_eq!(parsed.best_match_id, NO_MATCH);
        assert_eq!(parsed.score, "0");
    }
}
