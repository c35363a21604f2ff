use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::pipeline::retry::BackoffPolicy;

/// Primary credential variable.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Older name for the same credential, still honoured.
pub const LEGACY_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Application configuration loaded from environment variables.
/// Fails at startup if no API key is available.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv_override().ok(); // .env wins over inherited vars; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset everywhere.
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = [API_KEY_VAR, LEGACY_API_KEY_VAR]
            .into_iter()
            .find_map(var)
            .ok_or_else(|| {
                anyhow!(
                    "{API_KEY_VAR} not found (also checked {LEGACY_API_KEY_VAR}). \
                    Set it in the environment or in a .env file."
                )
            })?;

        let max_attempts = match var("SCOUT_MAX_ATTEMPTS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("SCOUT_MAX_ATTEMPTS must be a positive integer")?,
            None => BackoffPolicy::DEFAULT_MAX_ATTEMPTS,
        };
        if max_attempts == 0 {
            return Err(anyhow!("SCOUT_MAX_ATTEMPTS must be at least 1"));
        }

        let base_delay = match var("SCOUT_BASE_DELAY_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("SCOUT_BASE_DELAY_SECS must be a whole number of seconds")?,
            ),
            None => BackoffPolicy::DEFAULT_BASE_DELAY,
        };

        Ok(Config {
            api_key,
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            max_attempts,
            base_delay,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.max_attempts, self.base_delay)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_primary_key_is_trimmed() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "  abc123\n")])).unwrap();
        assert_eq!(config.api_key, "abc123");
    }

    #[test]
    fn test_legacy_key_used_when_primary_missing() {
        let config = Config::from_lookup(lookup_from(&[(LEGACY_API_KEY_VAR, "legacy")])).unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn test_blank_primary_falls_back_to_legacy() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "   "),
            (LEGACY_API_KEY_VAR, "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn test_missing_key_is_descriptive_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn test_defaults_match_backoff_policy() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "k")])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_delay, Duration::from_secs(10));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_retry_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("SCOUT_MAX_ATTEMPTS", "3"),
            ("SCOUT_BASE_DELAY_SECS", "1"),
        ]))
        .unwrap();
        let policy = config.backoff_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_blank_overrides_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("GEMINI_MODEL", ""),
            ("GEMINI_API_BASE", "   "),
            ("SCOUT_MAX_ATTEMPTS", ""),
            ("RUST_LOG", "\n"),
        ]))
        .unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.max_attempts, BackoffPolicy::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_model_override_is_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("GEMINI_MODEL", " gemini-2.5-pro \n"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("SCOUT_MAX_ATTEMPTS", "0"),
        ]));
        assert!(result.is_err());
    }
}
