//! GraphQL documents for the searchable team and fixture collections.

use resolver_matching::EntityType;

const TEAM_FIELDS: &str = "id name sport gender regionName teamType \
teamMembers { preferredJersey individual { id commonName { fullName givenName familyName } } } \
competitions { id name }";

const FIXTURE_FIELDS: &str = "id sport date \
competition { id name } \
homeTeam { id name } \
awayTeam { id name } \
result { homeTeam { standardScore additionalScore } awayTeam { standardScore additionalScore } } \
participants { individual { id } } \
rosters { team { id } participants { individual { id } } }";

pub fn selection_set(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Team => TEAM_FIELDS,
        EntityType::Fixture => FIXTURE_FIELDS,
    }
}

/// Render `value` as a GraphQL string literal. GraphQL string escapes are a
/// subset of JSON's, so JSON encoding is safe here.
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// Exact lookup of one record by its GSL id.
pub fn lookup_query(entity_type: EntityType, gsl_id: &str) -> String {
    format!(
        "query lookup {{ {field}(query: [{{ field: ID, operator: EQUALS, values: [{id}] }}]) {{ items {{ {fields} }} }} }}",
        field = entity_type.search_field(),
        id = string_literal(gsl_id),
        fields = selection_set(entity_type),
    )
}

/// Free-text search.
pub fn search_query(entity_type: EntityType, term: &str) -> String {
    format!(
        "query search {{ {field}(searchTerm: {term}) {{ items {{ {fields} }} }} }}",
        field = entity_type.search_field(),
        term = string_literal(term),
        fields = selection_set(entity_type),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_targets_the_entity_collection() {
        let query = lookup_query(EntityType::Team, "1234");
        assert!(query.contains("searchableTeams(query: [{ field: ID, operator: EQUALS, values: [\"1234\"] }])"));
        assert!(query.contains("teamMembers { preferredJersey"));

        let query = lookup_query(EntityType::Fixture, "55");
        assert!(query.contains("searchableFixtures("));
        assert!(query.contains("homeTeam { id name }"));
        assert!(!query.contains("teamMembers"));
    }

    #[test]
    fn search_terms_are_escaped() {
        let query = search_query(EntityType::Team, "St. Mary's \"Blue\" FC");
        assert!(query.contains(r#"searchTerm: "St. Mary's \"Blue\" FC""#), "{query}");
    }

    #[test]
    fn newlines_cannot_break_out_of_the_literal() {
        assert_eq!(string_literal("a\nb"), r#""a\nb""#);
    }
}
