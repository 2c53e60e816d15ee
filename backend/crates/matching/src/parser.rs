use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codec::decode_raw_id;

pub const BEST_MATCH_LABEL: &str = "Best Match ID:";
pub const SCORE_LABEL: &str = "Score:";
pub const JUSTIFICATION_LABEL: &str = "Justification:";

pub const NO_MATCH: &str = "no match found";
pub const DECODING_ERROR: &str = "decoding_error";
pub const PROCESSING_ERROR: &str = "processing error";

fn label_regex(label: &str, capture_rest: bool) -> Regex {
    let pattern = if capture_rest {
        format!(r"(?i){}\s*(.*)", regex::escape(label))
    } else {
        format!("(?i){}", regex::escape(label))
    };
    Regex::new(&pattern).expect("label patterns are valid regexes")
}

static BEST_MATCH_RE: LazyLock<Regex> = LazyLock::new(|| label_regex(BEST_MATCH_LABEL, true));
static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| label_regex(SCORE_LABEL, true));
static JUSTIFICATION_RE: LazyLock<Regex> =
    LazyLock::new(|| label_regex(JUSTIFICATION_LABEL, false));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    /// Raw catalog id, or one of `NO_MATCH` / `DECODING_ERROR`.
    pub best_match_id: String,
    pub justification: String,
    /// Kept verbatim; models sometimes write placeholders instead of numbers.
    pub score: String,
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Markdown emphasis and code spans models like to wrap values in.
fn strip_decoration(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, '*' | '`' | '_') || c.is_whitespace())
}

/// Decoration plus the brackets, quotes and trailing punctuation that end
/// up around an id copied out of a template.
fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| {
        matches!(
            c,
            '*' | '`' | '_' | '[' | ']' | '(' | ')' | '<' | '>' | '"' | '\'' | '.' | ',' | ';' | ':'
        ) || c.is_whitespace()
    })
}

/// Characters outside the base64 alphabet are dropped before decoding.
fn base64_payload(token: &str) -> String {
    token
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect()
}

pub fn is_no_match(token: &str) -> bool {
    strip_punctuation(token).eq_ignore_ascii_case(NO_MATCH)
}

pub fn parse_agent_output(raw: &str) -> ParsedAnswer {
    let match_token = first_capture(&BEST_MATCH_RE, raw);
    let score = first_capture(&SCORE_RE, raw)
        .map(|score| strip_decoration(&score).to_string())
        .unwrap_or_default();

    let justification = match JUSTIFICATION_RE.find(raw) {
        Some(m) => raw[m.end()..].trim().to_string(),
        None => raw.to_string(),
    };

    let best_match_id = match match_token {
        None => NO_MATCH.to_string(),
        Some(token) if is_no_match(&token) => NO_MATCH.to_string(),
        Some(token) => decode_match_token(&token),
    };

    ParsedAnswer {
        best_match_id,
        justification,
        score,
    }
}

fn decode_match_token(token: &str) -> String {
    let payload = base64_payload(token);
    match decode_raw_id(&payload) {
        Ok(id) if !id.trim().is_empty() => id,
        Ok(_) => {
            tracing::warn!(token, "best match id decoded to an empty string");
            DECODING_ERROR.to_string()
        }
        Err(e) => {
            tracing::warn!(token, error = %e, "could not decode best match id");
            DECODING_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_gsl_id;
    use crate::entity::EntityType;

    #[test]
    fn well_formed_answer_is_decoded() {
        let encoded = encode_gsl_id(EntityType::Team, "8841");
        let raw = format!(
            "Best Match ID: {encoded}\n\nScore: 5\n\nJustification:\n* Name Match (Rule 2): Pass, Score: 2"
        );
        let parsed = parse_agent_output(&raw);
        assert_eq!(parsed.best_match_id, "8841");
        assert_eq!(parsed.score, "5");
        assert_eq!(parsed.justification, "* Name Match (Rule 2): Pass, Score: 2");
    }

    #[test]
    fn fixture_prefix_is_stripped() {
        let encoded = encode_gsl_id(EntityType::Fixture, "fx-1");
        let parsed = parse_agent_output(&format!("> Best Match ID: {encoded}\n> Score: 4.5"));
        assert_eq!(parsed.best_match_id, "fx-1");
        assert_eq!(parsed.score, "4.5");
    }

    #[test]
    fn labels_are_case_insensitive() {
        let encoded = encode_gsl_id(EntityType::Team, "3");
        let parsed = parse_agent_output(&format!(
            "BEST MATCH ID: {encoded}\nscore: 2.5\njustification: close enough"
        ));
        assert_eq!(parsed.best_match_id, "3");
        assert_eq!(parsed.score, "2.5");
        assert_eq!(parsed.justification, "close enough");
    }

    #[test]
    fn missing_label_yields_no_match() {
        let parsed = parse_agent_output("I could not find anything useful.");
        assert_eq!(parsed.best_match_id, NO_MATCH);
        assert_eq!(parsed.score, "");
        assert_eq!(parsed.justification, "I could not find anything useful.");
    }

    #[test]
    fn explicit_no_match_is_not_decoded() {
        let parsed = parse_agent_output(
            "Best Match ID: No Match Found\nScore: 0\nJustification: nothing passed",
        );
        assert_eq!(parsed.best_match_id, NO_MATCH);
        assert_eq!(parsed.score, "0");
        assert_eq!(parsed.justification, "nothing passed");
    }

    #[test]
    fn non_base64_token_yields_decoding_error() {
        let parsed = parse_agent_output("Best Match ID: team#42!\nScore: 3");
        assert_eq!(parsed.best_match_id, DECODING_ERROR);
    }

    #[test]
    fn empty_token_yields_decoding_error() {
        let parsed = parse_agent_output("Best Match ID:");
        assert_eq!(parsed.best_match_id, DECODING_ERROR);
    }

    #[test]
    fn markdown_decoration_is_ignored() {
        let encoded = encode_gsl_id(EntityType::Team, "77");
        let parsed = parse_agent_output(&format!("Best Match ID: `{encoded}`"));
        assert_eq!(parsed.best_match_id, "77");
    }

    #[test]
    fn bracketed_and_punctuated_ids_are_decoded() {
        let encoded = encode_gsl_id(EntityType::Team, "123");
        for answer in [
            format!("Best Match ID: [{encoded}]"),
            format!("Best Match ID: {encoded}."),
            format!("Best Match ID: \"{encoded}\","),
            format!("**Best Match ID:** <{encoded}>"),
        ] {
            assert_eq!(parse_agent_output(&answer).best_match_id, "123", "{answer}");
        }
    }

    #[test]
    fn bracketed_no_match_is_recognized() {
        let parsed = parse_agent_output("Best Match ID: [no match found].");
        assert_eq!(parsed.best_match_id, NO_MATCH);
    }

    #[test]
    fn bold_labels_leave_a_clean_score() {
        let encoded = encode_gsl_id(EntityType::Fixture, "fx-2");
        let parsed = parse_agent_output(&format!(
            "**Best Match ID:** `{encoded}`\n\n**Score:** 4.5\n\n**Justification:** close"
        ));
        assert_eq!(parsed.best_match_id, "fx-2");
        assert_eq!(parsed.score, "4.5");
    }

    #[test]
    fn score_placeholder_is_kept_verbatim() {
        let parsed = parse_agent_output("Score: [Result from tool]");
        assert_eq!(parsed.score, "[Result from tool]");
    }

    #[test]
    fn justification_takes_everything_after_first_label() {
        let parsed = parse_agent_output(
            "Justification: first part\nJustification: second part",
        );
        assert_eq!(parsed.justification, "first part\nJustification: second part");
    }
}
