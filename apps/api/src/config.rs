use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_BASE;

const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// A missing API key is not fatal: it surfaces as a configuration message per question.
#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub deepseek_api_base: String,
    /// Max stored turns per session; `None` keeps every turn.
    pub chat_history_capacity: Option<usize>,
    /// Sessions idle this long are evicted; `None` keeps them until deleted.
    pub session_idle_ttl: Option<Duration>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            deepseek_api_key: non_blank("DEEPSEEK_API_KEY").map(|k| k.trim().to_string()),
            deepseek_api_base: non_blank("DEEPSEEK_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            chat_history_capacity: non_blank("CHAT_HISTORY_CAPACITY")
                .map(|v| v.trim().parse::<usize>())
                .transpose()
                .context("CHAT_HISTORY_CAPACITY must be a non-negative integer")?,
            // 0 disables idle eviction
            session_idle_ttl: Some(
                non_blank("SESSION_IDLE_TTL_SECS")
                    .map(|v| v.trim().parse::<u64>())
                    .transpose()
                    .context("SESSION_IDLE_TTL_SECS must be a non-negative integer")?
                    .unwrap_or(DEFAULT_SESSION_IDLE_TTL_SECS),
            )
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
            port: non_blank("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_blank("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.deepseek_api_key, None);
        assert_eq!(config.deepseek_api_base, DEFAULT_API_BASE);
        assert_eq!(config.chat_history_capacity, None);
        assert_eq!(config.session_idle_ttl, Some(Duration::from_secs(3600)));
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = config(&[("DEEPSEEK_API_KEY", "  ")]).unwrap();
        assert_eq!(config.deepseek_api_key, None);
    }

    #[test]
    fn test_values_are_read() {
        let config = config(&[
            ("DEEPSEEK_API_KEY", " sk-123 "),
            ("DEEPSEEK_API_BASE", "http://localhost:9000/v1"),
            ("CHAT_HISTORY_CAPACITY", "40"),
            ("SESSION_IDLE_TTL_SECS", "900"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.deepseek_api_key.as_deref(), Some("sk-123"));
        assert_eq!(config.deepseek_api_base, "http://localhost:9000/v1");
        assert_eq!(config.chat_history_capacity, Some(40));
        assert_eq!(config.session_idle_ttl, Some(Duration::from_secs(900)));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_zero_idle_ttl_disables_eviction() {
        let config = config(&[("SESSION_IDLE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.session_idle_ttl, None);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("CHAT_HISTORY_CAPACITY", "-1")]).is_err());
        assert!(config(&[("SESSION_IDLE_TTL_SECS", "soon")]).is_err());
    }
}
