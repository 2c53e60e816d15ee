//! GSL id encoding: ids travel as `base64(prefix + raw_id)`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::entity::EntityType;

const KNOWN_PREFIXES: &[&str] = &["GSLSearchableTeam", "GSLSearchableFixture"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("decoded id is not valid UTF-8")]
    Utf8,
}

/// Encode a raw catalog id the way the catalog exposes it.
pub fn encode_gsl_id(entity_type: EntityType, raw_id: &str) -> String {
    STANDARD.encode(format!("{}{raw_id}", entity_type.id_prefix()))
}

/// Decode an encoded id into its prefixed form (e.g. `GSLSearchableTeam123`).
pub fn decode_gsl_id(encoded: &str) -> Result<String, CodecError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CodecError::Base64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| CodecError::Utf8)
}

/// Remove a leading `GSLSearchableTeam` / `GSLSearchableFixture` marker.
pub fn strip_id_prefix(decoded: &str) -> &str {
    KNOWN_PREFIXES
        .iter()
        .find_map(|prefix| decoded.strip_prefix(prefix))
        .unwrap_or(decoded)
}

/// Decode and strip in one step, yielding the raw catalog id.
pub fn decode_raw_id(encoded: &str) -> Result<String, CodecError> {
    decode_gsl_id(encoded).map(|decoded| strip_id_prefix(&decoded).to_owned())
}

/// Comparable form of an id that may be encoded or raw: encoded GSL ids are
/// reduced to their raw id, anything else is returned trimmed.
pub fn normalize_id(id: &str) -> String {
    let id = id.trim();
    match decode_gsl_id(id) {
        Ok(decoded) if KNOWN_PREFIXES.iter().any(|p| decoded.starts_with(p)) => {
            strip_id_prefix(&decoded).to_owned()
        }
        _ => id.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_entity_prefix() {
        assert_eq!(
            encode_gsl_id(EntityType::Team, "42"),
            STANDARD.encode("GSLSearchableTeam42")
        );
    }

    #[test]
    fn decode_raw_id_strips_team_and_fixture_prefixes() {
        let team = encode_gsl_id(EntityType::Team, "team-7");
        let fixture = encode_gsl_id(EntityType::Fixture, "fx-9");
        assert_eq!(decode_raw_id(&team).unwrap(), "team-7");
        assert_eq!(decode_raw_id(&fixture).unwrap(), "fx-9");
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let encoded = format!("  {}\n", encode_gsl_id(EntityType::Team, "1"));
        assert_eq!(decode_gsl_id(&encoded).unwrap(), "GSLSearchableTeam1");
    }

    #[test]
    fn unprefixed_payload_is_returned_as_is() {
        let encoded = STANDARD.encode("plain-id");
        assert_eq!(decode_raw_id(&encoded).unwrap(), "plain-id");
    }

    #[test]
    fn strip_only_removes_leading_marker() {
        assert_eq!(strip_id_prefix("abcGSLSearchableTeam"), "abcGSLSearchableTeam");
    }

    #[test]
    fn normalize_reduces_encoded_and_keeps_raw() {
        let encoded = encode_gsl_id(EntityType::Team, "55");
        assert_eq!(normalize_id(&encoded), "55");
        assert_eq!(normalize_id(" 55 "), "55");
        // Valid base64 without a catalog prefix is not treated as encoded.
        assert_eq!(normalize_id("abcd"), "abcd");
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(
            decode_gsl_id("not base64!!"),
            Err(CodecError::Base64(_))
        ));
        let invalid_utf8 = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert_eq!(decode_gsl_id(&invalid_utf8), Err(CodecError::Utf8));
    }
}
