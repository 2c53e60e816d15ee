pub mod arithmetic;
pub mod codec;
pub mod engine;
pub mod entity;
pub mod outcome;
pub mod parser;
pub mod prompt;
pub mod record;
pub mod rubric;
pub mod scorers;
pub mod tools;
pub mod trace;

pub use engine::{audit, select_best, Selection};
pub use entity::{EntityType, ScoringMethod};
pub use outcome::{MatchOutcome, OutcomeStatus};
pub use parser::{parse_agent_output, ParsedAnswer};
pub use prompt::{compose_system_prompt, compose_user_message};
pub use rubric::{get_rubric, rubric_for, Rubric};
pub use trace::Audit;
