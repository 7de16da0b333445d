//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve the database path, logging settings, latency and assistant options.
//! - Reject malformed numeric or boolean values instead of guessing.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - `from_lookup` is pure; tests inject variables without touching the process env.

use crate::logging::default_log_level;
use crate::store::latency::LatencyProfile;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "NEXUS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "NEXUS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NEXUS_LOG_DIR";
pub const ENV_SIMULATE_LATENCY: &str = "NEXUS_SIMULATE_LATENCY";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";
pub const ENV_ASSISTANT_MODEL: &str = "NEXUS_ASSISTANT_MODEL";
pub const ENV_ASSISTANT_BASE_URL: &str = "NEXUS_ASSISTANT_BASE_URL";
pub const ENV_ASSISTANT_TIMEOUT_SECS: &str = "NEXUS_ASSISTANT_TIMEOUT_SECS";

pub const DEFAULT_DB_PATH: &str = "nexus_crm.sqlite3";
pub const DEFAULT_ASSISTANT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ASSISTANT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_ASSISTANT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBool { key: &'static str, value: String },
    InvalidNumber { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBool { key, value } => {
                write!(f, "{key} must be a boolean (1|0|true|false), got `{value}`")
            }
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Connection settings for the generative text backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Extra attempts after the first one for transient failures.
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ASSISTANT_MODEL.to_string(),
            base_url: DEFAULT_ASSISTANT_BASE_URL.to_string(),
            timeout: DEFAULT_ASSISTANT_TIMEOUT,
            max_retries: 1,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub latency: LatencyProfile,
    pub assistant: AssistantConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            latency: LatencyProfile::none(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = get(ENV_LOG_DIR).map(PathBuf::from);

        if let Some(raw) = get(ENV_SIMULATE_LATENCY) {
            if parse_bool(ENV_SIMULATE_LATENCY, &raw)? {
                config.latency = LatencyProfile::simulated();
            }
        }

        config.assistant.api_key = get(ENV_API_KEY).or_else(|| get(ENV_API_KEY_FALLBACK));
        if let Some(model) = get(ENV_ASSISTANT_MODEL) {
            config.assistant.model = model;
        }
        if let Some(base_url) = get(ENV_ASSISTANT_BASE_URL) {
            config.assistant.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get(ENV_ASSISTANT_TIMEOUT_SECS) {
            config.assistant.timeout = parse_secs(ENV_ASSISTANT_TIMEOUT_SECS, &raw)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_ASSISTANT_MODEL};
    use crate::store::latency::LatencyProfile;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("nexus_crm.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.latency, LatencyProfile::none());
        assert_eq!(config.assistant.model, DEFAULT_ASSISTANT_MODEL);
        assert_eq!(config.assistant.timeout, Duration::from_secs(30));
        assert_eq!(config.assistant.max_retries, 1);
        assert!(config.assistant.api_key.is_none());
    }

    #[test]
    fn reads_overrides_and_api_key_fallback() {
        let config = CoreConfig::from_lookup(lookup(&[
            ("NEXUS_DB_PATH", "/tmp/crm.db"),
            ("NEXUS_SIMULATE_LATENCY", "true"),
            ("API_KEY", "fallback-key"),
            ("NEXUS_ASSISTANT_BASE_URL", "http://127.0.0.1:9000/"),
            ("NEXUS_ASSISTANT_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/crm.db"));
        assert_eq!(config.latency, LatencyProfile::simulated());
        assert_eq!(config.assistant.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(config.assistant.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.assistant.timeout, Duration::from_secs(5));
    }

    #[test]
    fn primary_api_key_wins_over_fallback() {
        let config = CoreConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.assistant.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = CoreConfig::from_lookup(lookup(&[("NEXUS_SIMULATE_LATENCY", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));

        let err = CoreConfig::from_lookup(lookup(&[("NEXUS_ASSISTANT_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }
}
