//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::{HeaderValue, Uri};
use std::net::SocketAddr;
use study_dashboard_core::AnswerMismatchPolicy;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    /// Overrides the endpoint for OpenAI-compatible providers.
    pub openai_api_base: Option<String>,
    pub study_model: String,
    pub quiz_answer_policy: AnswerMismatchPolicy,
    pub seed_fixtures: bool,
    /// The single browser origin allowed by CORS, e.g. `http://localhost:9002`.
    pub cors_origin: HeaderValue,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:8080");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = parse_origin(&var_or("CORS_ORIGIN", "http://localhost:9002"))
            .map_err(|reason| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), reason))?;

        let seed_str = var_or("SEED_FIXTURES", "true");
        let seed_fixtures = match seed_str.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                return Err(ConfigError::InvalidValue(
                    "SEED_FIXTURES".to_string(),
                    format!("'{}' is not a boolean", seed_str),
                ))
            }
        };

        // --- Load Model Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        let openai_api_base = lookup("OPENAI_API_BASE").filter(|b| !b.trim().is_empty());
        let study_model = var_or("STUDY_MODEL", "gpt-4o-mini");

        let quiz_answer_policy = var_or("QUIZ_ANSWER_POLICY", "reject")
            .parse::<AnswerMismatchPolicy>()
            .map_err(|e| ConfigError::InvalidValue("QUIZ_ANSWER_POLICY".to_string(), e))?;

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            openai_api_base,
            study_model,
            quiz_answer_policy,
            seed_fixtures,
            cors_origin,
        })
    }

    /// The model credential, which only the server binary insists on.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}

/// Accepts `scheme://host[:port]` for http(s), with at most a trailing slash.
fn parse_origin(value: &str) -> Result<HeaderValue, String> {
    let not_an_origin = || format!("'{}' is not an http(s) origin", value);
    let uri = value.trim().parse::<Uri>().map_err(|_| not_an_origin())?;
    let is_origin = matches!(uri.scheme_str(), Some("http" | "https"))
        && uri.authority().is_some()
        && matches!(uri.path(), "" | "/")
        && uri.query().is_none();
    if !is_origin {
        return Err(not_an_origin());
    }
    HeaderValue::from_str(value.trim().trim_end_matches('/')).map_err(|_| not_an_origin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.study_model, "gpt-4o-mini");
        assert_eq!(config.quiz_answer_policy, AnswerMismatchPolicy::Reject);
        assert!(config.seed_fixtures);
        assert_eq!(config.cors_origin.to_str().unwrap(), "http://localhost:9002");
        assert!(config.openai_api_base.is_none());
        assert!(matches!(
            config.require_openai_api_key(),
            Err(ConfigError::MissingVar(_))
        ));
    }

    #[test]
    fn values_are_read_from_the_source() {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("RUST_LOG", "debug"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:11434/v1"),
            ("QUIZ_ANSWER_POLICY", "first-option"),
            ("SEED_FIXTURES", "false"),
            ("CORS_ORIGIN", "https://study.example.edu/"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.require_openai_api_key().unwrap(), "sk-test");
        assert_eq!(
            config.openai_api_base.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert_eq!(
            config.quiz_answer_policy,
            AnswerMismatchPolicy::FallbackToFirstOption
        );
        assert!(!config.seed_fixtures);
        assert_eq!(config.cors_origin.to_str().unwrap(), "https://study.example.edu");
    }

    #[test]
    fn invalid_values_name_the_variable() {
        for (key, value) in [
            ("BIND_ADDRESS", "not-an-address"),
            ("RUST_LOG", "loud"),
            ("QUIZ_ANSWER_POLICY", "maybe"),
            ("SEED_FIXTURES", "sometimes"),
            ("CORS_ORIGIN", "localhost:9002"),
            ("CORS_ORIGIN", "http://localhost:9002/app"),
            ("CORS_ORIGIN", "not an origin"),
        ] {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, key),
                other => panic!("expected InvalidValue for {key}, got {other:?}"),
            }
        }
    }
}
