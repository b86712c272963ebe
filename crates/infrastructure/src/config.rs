//! Environment-sourced configuration.
//!
//! Three values configure the whole bootstrap: the backing API base URL
//! and the identity provider's API key and project id. Values are taken
//! as-is; malformed ones surface later as provider or request failures.

use thiserror::Error;

/// Environment variable holding the backing API base URL.
pub const ENV_API_URL: &str = "DOORMAN_API_URL";
/// Environment variable holding the identity provider API key.
pub const ENV_IDENTITY_API_KEY: &str = "DOORMAN_IDENTITY_API_KEY";
/// Environment variable holding the identity provider project id.
pub const ENV_IDENTITY_PROJECT: &str = "DOORMAN_IDENTITY_PROJECT";

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the backing API.
    pub api_url: String,
    /// Identity provider API key.
    pub identity_api_key: String,
    /// Identity provider project id.
    pub identity_project: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` naming the first variable that
    /// is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` naming the first variable the
    /// lookup does not resolve.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::MissingVar(key));

        Ok(Self {
            api_url: require(ENV_API_URL)?,
            identity_api_key: require(ENV_IDENTITY_API_KEY)?,
            identity_project: require(ENV_IDENTITY_PROJECT)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn vars(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_all_vars_present() {
        let env = vars(&[
            (ENV_API_URL, "https://api.example.com/api"),
            (ENV_IDENTITY_API_KEY, "key123"),
            (ENV_IDENTITY_PROJECT, "acme-lab"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        assert_eq!(config.api_url, "https://api.example.com/api");
        assert_eq!(config.identity_api_key, "key123");
        assert_eq!(config.identity_project, "acme-lab");
    }

    #[test]
    fn test_missing_var_is_named() {
        let env = vars(&[(ENV_API_URL, "https://api.example.com/api")]);
        let result = AppConfig::from_lookup(|key| env.get(key).cloned());
        assert_eq!(result, Err(ConfigError::MissingVar(ENV_IDENTITY_API_KEY)));
    }

    #[test]
    fn test_values_are_taken_verbatim() {
        // No validation: a malformed URL is handed through and fails at
        // the adapter that uses it.
        let env = vars(&[
            (ENV_API_URL, "not a url"),
            (ENV_IDENTITY_API_KEY, "k"),
            (ENV_IDENTITY_PROJECT, "p"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        assert_eq!(config.api_url, "not a url");
    }
}
