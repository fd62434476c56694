use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Bearer token required on `/v1` routes when set
    pub auth_token: Option<String>,
    /// JSON snapshot of the record, loaded at start and rewritten on every write
    pub data_file: Option<PathBuf>,
    /// Upper bound for a single long-poll wait
    pub max_wait: Duration,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("data_file", &self.data_file)
            .field("max_wait", &self.max_wait)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "SYNK_API_BIND_ADDR", "127.0.0.1:8080");
        let auth_token = optional_trimmed(&lookup, "SYNK_API_TOKEN");
        let data_file = optional_trimmed(&lookup, "SYNK_API_DATA_FILE").map(PathBuf::from);

        let max_wait_secs = value_or_default(&lookup, "SYNK_API_MAX_WAIT_SECS", "30")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "SYNK_API_MAX_WAIT_SECS must be an integer in [1, 300]".to_string(),
                )
            })?;
        if !(1..=300).contains(&max_wait_secs) {
            return Err(ConfigError::Invalid(
                "SYNK_API_MAX_WAIT_SECS must be in [1, 300]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            auth_token,
            data_file,
            max_wait: Duration::from_secs(max_wait_secs),
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn config_defaults_without_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let config =
            AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string())).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.data_file, None);
        assert_eq!(config.max_wait, Duration::from_secs(30));
    }

    #[test]
    fn config_rejects_out_of_range_wait() {
        for value in ["0", "301", "soon"] {
            let err = AppConfig::from_lookup(|key| {
                (key == "SYNK_API_MAX_WAIT_SECS").then(|| value.to_string())
            })
            .unwrap_err();
            assert!(err.to_string().contains("SYNK_API_MAX_WAIT_SECS"));
        }
    }

    #[test]
    fn config_redacts_token_in_debug() {
        let mut map = HashMap::new();
        map.insert("SYNK_API_TOKEN", " sensitive-room-token ");
        map.insert("SYNK_API_DATA_FILE", "/var/lib/synk/record.json");

        let config =
            AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string())).unwrap();
        assert_eq!(config.auth_token.as_deref(), Some("sensitive-room-token"));

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("sensitive-room-token"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
