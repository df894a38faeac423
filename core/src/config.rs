//! Client configuration: where the todo service lives and how to
//! authenticate against it.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const ENDPOINT_VAR: &str = "TODO_API_ENDPOINT";
pub const API_KEY_VAR: &str = "TODO_API_KEY";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Parse a TOML document such as
    ///
    /// ```toml
    /// endpoint = "https://todos.example.com"
    /// api_key = "da2-..."
    /// timeout_ms = 5000
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(source)?;
        config.normalized()
    }

    /// Read `TODO_API_ENDPOINT` (required) and `TODO_API_KEY` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup(ENDPOINT_VAR).ok_or(ConfigError::MissingVar(ENDPOINT_VAR))?;
        let api_key = lookup(API_KEY_VAR).filter(|k| !k.is_empty());
        Self {
            endpoint,
            api_key,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
        .normalized()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        if self.endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_applies_defaults() {
        let config = ClientConfig::from_toml(r#"endpoint = "http://localhost:3000/""#).unwrap();
        assert_eq!(config, ClientConfig::new("http://localhost:3000"));
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn toml_reads_all_fields() {
        let config = ClientConfig::from_toml(
            r#"
            endpoint = "https://todos.example.com"
            api_key = "da2-abc"
            timeout_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("da2-abc"));
        assert_eq!(config.timeout_ms, 2500);
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = ClientConfig::from_toml(r#"endpoint = " / ""#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyEndpoint));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_toml(
            r#"
            endpoint = "http://localhost:3000"
            timeout_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
    }

    #[test]
    fn env_requires_endpoint() {
        let err = ClientConfig::from_lookup(vars(&[(API_KEY_VAR, "da2-abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENDPOINT_VAR)));
    }

    #[test]
    fn env_reads_endpoint_and_key() {
        let config = ClientConfig::from_lookup(vars(&[
            (ENDPOINT_VAR, " https://todos.example.com/ "),
            (API_KEY_VAR, "da2-abc"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "https://todos.example.com");
        assert_eq!(config.api_key.as_deref(), Some("da2-abc"));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn env_empty_key_means_no_key() {
        let config = ClientConfig::from_lookup(vars(&[
            (ENDPOINT_VAR, "http://localhost:3000"),
            (API_KEY_VAR, ""),
        ]))
        .unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn env_blank_endpoint_is_rejected() {
        let err = ClientConfig::from_lookup(vars(&[(ENDPOINT_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyEndpoint));
    }

    #[test]
    fn missing_endpoint_is_a_parse_error() {
        let err = ClientConfig::from_toml("api_key = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
