use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; a malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory candidate store.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub extraction_timeout_secs: u64,
    pub search_limit: usize,
    pub summary_chars: usize,
    pub max_query_chars: usize,
    /// Comma-separated replacement for the built-in skill list.
    pub skill_vocabulary: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            extraction_timeout_secs: parse_env("EXTRACTION_TIMEOUT_SECS", 30)?,
            search_limit: parse_env("SEARCH_LIMIT", 100)?,
            summary_chars: parse_env("SUMMARY_CHARS", 400)?,
            max_query_chars: parse_env("MAX_QUERY_CHARS", 256)?,
            skill_vocabulary: optional_env("SKILL_VOCABULARY"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            extraction_timeout_secs: 30,
            search_limit: 100,
            summary_chars: 400,
            max_query_chars: 256,
            skill_vocabulary: None,
        }
    }
}

/// Unset and blank are treated the same.
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
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name; the process environment is shared.

    #[test]
    fn test_parse_env_falls_back_to_default() {
        std::env::remove_var("RESUME_SEARCH_TEST_UNSET");
        assert_eq!(parse_env("RESUME_SEARCH_TEST_UNSET", 42usize).unwrap(), 42);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("RESUME_SEARCH_TEST_PORT", " 9090 ");
        assert_eq!(parse_env::<u16>("RESUME_SEARCH_TEST_PORT", 8080).unwrap(), 9090);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUME_SEARCH_TEST_BAD", "ten");
        let err = parse_env::<u64>("RESUME_SEARCH_TEST_BAD", 30).unwrap_err();
        assert!(err.to_string().contains("RESUME_SEARCH_TEST_BAD"));
    }

    #[test]
    fn test_blank_is_unset() {
        std::env::set_var("RESUME_SEARCH_TEST_BLANK", "   ");
        assert_eq!(optional_env("RESUME_SEARCH_TEST_BLANK"), None);
    }
}
