use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("agent error: {0}")]
    Agent(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ResolverResult<T> = Result<T, ResolverError>;
