//! Runtime configuration, read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Missing credentials are not errors: the matching provider is simply left
//! out and the service degrades to whatever is configured.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DB_PATH: &str = "horror_movies.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 20;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub omdb_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub db_path: PathBuf,
    pub bind_addr: String,
    pub http_timeout: Duration,
    pub openai_timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            omdb_api_key: None,
            tmdb_api_key: None,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            openai_timeout: Duration::from_secs(DEFAULT_OPENAI_TIMEOUT_SECS),
        }
    }
}

impl OracleConfig {
    /// Load `.env` (if any), then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            omdb_api_key: get("OMDB_API_KEY"),
            tmdb_api_key: get("TMDB_API_KEY"),
            db_path: get("HORROR_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            bind_addr: get("ORACLE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            http_timeout: seconds("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"))?
                .unwrap_or(defaults.http_timeout),
            openai_timeout: seconds("OPENAI_TIMEOUT_SECS", get("OPENAI_TIMEOUT_SECS"))?
                .unwrap_or(defaults.openai_timeout),
        })
    }
}

fn seconds(var: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<OracleConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        OracleConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, OracleConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_values_are_read() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("TMDB_API_KEY", "tmdb"),
            ("OMDB_API_KEY", " omdb "),
            ("HORROR_DB_PATH", "/tmp/movies.db"),
            ("ORACLE_BIND_ADDR", "127.0.0.1:8080"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("OPENAI_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.omdb_api_key.as_deref(), Some("omdb"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/movies.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.openai_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let config = config_from(&[("TMDB_API_KEY", "   "), ("OMDB_API_KEY", "")]).unwrap();
        assert!(config.tmdb_api_key.is_none());
        assert!(config.omdb_api_key.is_none());
    }

    #[test]
    fn test_bad_timeout() {
        assert_eq!(
            config_from(&[("HTTP_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidValue {
                var: "HTTP_TIMEOUT_SECS",
                value: "soon".to_string()
            })
        );
        assert!(config_from(&[("OPENAI_TIMEOUT_SECS", "0")]).is_err());
    }
}
