use resolver_matching::{ParsedAnswer, Selection};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub rubric: String,
    pub selection: Selection,
    /// The selection rendered in the agent answer format.
    pub answer: String,
    /// `answer` run back through the output parser.
    pub parsed: ParsedAnswer,
}
