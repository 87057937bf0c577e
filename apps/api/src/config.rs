use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Largest interview a single request may create.
pub const MAX_QUESTION_COUNT: usize = 25;

/// Per-attempt LLM timeout. Retries multiply it, and the candidate is waiting
/// on every attempt before the heuristic engine takes over.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 15;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Unset → the service runs on the heuristic engine only.
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout: Duration,
    /// JSON file overriding the built-in template tables.
    pub templates_path: Option<PathBuf>,
    /// Seeds the heuristic engine's random source for reproducible runs.
    pub engine_seed: Option<u64>,
    pub default_question_count: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_question_count = parse_env("DEFAULT_QUESTION_COUNT", 5usize)?;
        anyhow::ensure!(
            (1..=MAX_QUESTION_COUNT).contains(&default_question_count),
            "DEFAULT_QUESTION_COUNT must be between 1 and {MAX_QUESTION_COUNT}"
        );

        let llm_timeout_secs = parse_env("LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?;
        anyhow::ensure!(llm_timeout_secs > 0, "LLM_TIMEOUT_SECS must be at least 1");

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            templates_path: optional_env("TEMPLATES_PATH").map(PathBuf::from),
            engine_seed: optional_env("ENGINE_SEED")
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("ENGINE_SEED must be an unsigned integer")?,
            default_question_count,
            port: parse_env("PORT", 8080u16)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Set and non-blank, else `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
