use anyhow::Result;

use crate::errors::AppError;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup, before any file is touched, if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub api_base: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process env.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            openai_api_key: require_env(&lookup, "OPENAI_API_KEY")?,
            model: optional_env(&lookup, "OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: optional_env(&lookup, "OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            rust_log: optional_env(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Blank values count as unset.
fn optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn require_env<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional_env(lookup, key).ok_or_else(|| AppError::MissingCredential(key).into())
}
