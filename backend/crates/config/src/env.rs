use resolver_common::error::{ResolverError, ResolverResult};
use serde::Deserialize;
use std::env;

const ENTITY_TYPES: &[&str] = &["team", "fixture"];
const SCORING_METHODS: &[&str] = &["weighted", "binary"];

/// Settings for the tool-calling model endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_iterations: u32,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn from_env() -> ResolverResult<Self> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            base_url: get_var_or("LLM_BASE_URL", "https://api.anthropic.com"),
            api_key: get_var("LLM_API_KEY")?,
            model: get_var_or("LLM_MODEL", "claude-3-5-sonnet-20240620"),
            max_tokens: parse_var("LLM_MAX_TOKENS", "4096")?,
            temperature: parse_var("LLM_TEMPERATURE", "0.0")?,
            top_p: parse_optional_var("LLM_TOP_P")?,
            max_iterations: parse_var("AGENT_MAX_ITERATIONS", "25")?,
            max_retries: parse_var("LLM_MAX_RETRIES", "3")?,
            timeout_secs: parse_var("LLM_TIMEOUT_SECS", "120")?,
        })
    }
}

/// Settings for the GraphQL catalog that holds teams and fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub api_key: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub fn from_env() -> ResolverResult<Self> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            endpoint: get_var("CATALOG_ENDPOINT")?,
            api_key: get_var("CATALOG_API_KEY")?,
            max_retries: parse_var("CATALOG_MAX_RETRIES", "3")?,
            timeout_secs: parse_var("CATALOG_TIMEOUT_SECS", "30")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub entity_type: String,
    pub scoring_method: String,
    pub llm: LlmConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    /// Entity type and scoring method must name a known rubric.
    pub fn from_env() -> ResolverResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "5000")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            cors_origins: split_list(&get_var_or("CORS_ORIGINS", "")),
            entity_type: get_choice("MATCH_ENTITY_TYPE", "team", ENTITY_TYPES)?,
            scoring_method: get_choice("MATCH_SCORING_METHOD", "weighted", SCORING_METHODS)?,
            llm: LlmConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var(key: &str) -> ResolverResult<String> {
    env::var(key).map_err(|_| ResolverError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> ResolverResult<T>
where
    T::Err: std::fmt::Display,
{
    get_var_or(key, default)
        .trim()
        .parse()
        .map_err(|e| ResolverError::Config(format!("invalid {key}: {e}")))
}

fn parse_optional_var<T: std::str::FromStr>(key: &str) -> ResolverResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ResolverError::Config(format!("invalid {key}: {e}"))),
        _ => Ok(None),
    }
}

fn get_choice(key: &str, default: &str, allowed: &[&str]) -> ResolverResult<String> {
    let value = get_var_or(key, default).trim().to_lowercase();
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ResolverError::Config(format!(
            "{key} must be one of {allowed:?}, got {value:?}"
        )))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
