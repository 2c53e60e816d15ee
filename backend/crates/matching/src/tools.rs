use serde::Serialize;
use serde_json::{json, Value};

use crate::entity::EntityType;

pub const FETCH_ENTITY_TOOL: &str = "get_entity_by_id";
pub const SEARCH_ENTITIES_TOOL: &str = "find_matching_entities";
pub const DECODE_ID_TOOL: &str = "decode_base64_id";
pub const ADD_NUMBERS_TOOL: &str = "add_multiple_numbers";

/// One tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: String,
    pub input_schema: Value,
}

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

pub fn fetch_entity_spec(entity_type: EntityType) -> ToolSpec {
    ToolSpec {
        name: FETCH_ENTITY_TOOL,
        description: format!(
            "Fetches the full details for a single {entity_type} by its unique GSL ID."
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "gsl_id": string_property("The unique GSL ID of the source entity to be merged.")
            },
            "required": ["gsl_id"]
        }),
    }
}

pub fn search_entities_spec(entity_type: EntityType) -> ToolSpec {
    ToolSpec {
        name: SEARCH_ENTITIES_TOOL,
        description: format!(
            "Searches for {entity_type} records by a name or keyword and returns a list of potential matches. The source entity itself is excluded."
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "source_gsl_id": string_property(
                    "The GSL ID of the source entity to compare against potential matches."
                ),
                "search_term": string_property("A name or keyword to search for matching entities.")
            },
            "required": ["source_gsl_id", "search_term"]
        }),
    }
}

pub fn decode_id_spec() -> ToolSpec {
    ToolSpec {
        name: DECODE_ID_TOOL,
        description: "Decodes a base64 encoded string and returns the original value. Returns an empty string when the input cannot be decoded.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "encoded_id": string_property("The base64 encoded id string to decode.")
            },
            "required": ["encoded_id"]
        }),
    }
}

pub fn add_numbers_spec() -> ToolSpec {
    ToolSpec {
        name: ADD_NUMBERS_TOOL,
        description: "Adds multiple numbers together and returns the sum. Fractional values such as 0.5 are supported.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "numbers": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "A list of numbers to add together."
                }
            },
            "required": ["numbers"]
        }),
    }
}

/// Full tool set bound to an agent for one entity type, in a stable order.
pub fn agent_tools(entity_type: EntityType) -> Vec<ToolSpec> {
    vec![
        fetch_entity_spec(entity_type),
        search_entities_spec(entity_type),
        decode_id_spec(),
        add_numbers_spec(),
    ]
}
