//! Configuration for the todo binary.
//!
//! Only ambient settings live here (logging and the runtime guard). Todo
//! data never comes from the environment.

use reducer_runtime::StoreConfig;
use std::env;
use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};

/// Log filter variable, checked before `RUST_LOG`
pub const LOG_ENV: &str = "TODO_LOG";
/// Feedback action limit variable
pub const MAX_FEEDBACK_ENV: &str = "TODO_MAX_FEEDBACK_ACTIONS";
/// Filter used when no variable is set
pub const DEFAULT_LOG_FILTER: &str = "todo=info,reducer_runtime=warn";

/// Errors while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse
    #[error("{var} must be a positive integer, got `{value}`")]
    InvalidNumber {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive string
    pub log_filter: String,
    /// Store runtime settings
    pub store: StoreConfig,
}

impl Config {
    /// Loads configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a numeric variable is set
    /// but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a numeric variable is set
    /// but does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|filter: &String| !filter.trim().is_empty());
        let log_filter = non_blank(LOG_ENV)
            .or_else(|| non_blank("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let mut store = StoreConfig::default();
        if let Some(raw) = lookup(MAX_FEEDBACK_ENV) {
            let limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: MAX_FEEDBACK_ENV,
                    value: raw.clone(),
                })?;
            store = store.with_max_feedback_actions(limit);
        }

        Ok(Self { log_filter, store })
    }

    /// Builds the tracing filter from `log_filter`
    ///
    /// # Errors
    ///
    /// Returns the parse error if any directive is invalid.
    pub fn env_filter(&self) -> Result<EnvFilter, ParseError> {
        EnvFilter::try_new(&self.log_filter)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            store: StoreConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn todo_log_wins_over_rust_log() {
        let config = Config::from_lookup(lookup(&[("TODO_LOG", "todo=trace"), ("RUST_LOG", "warn")]));
        assert_eq!(config.map(|c| c.log_filter), Ok("todo=trace".to_string()));

        let config = Config::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.map(|c| c.log_filter), Ok("warn".to_string()));
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[("TODO_LOG", "  ")]));
        assert_eq!(config.map(|c| c.log_filter), Ok(DEFAULT_LOG_FILTER.to_string()));
    }

    #[test]
    fn blank_todo_log_falls_back_to_rust_log() {
        let config = Config::from_lookup(lookup(&[("TODO_LOG", ""), ("RUST_LOG", "debug")]));
        assert_eq!(config.map(|c| c.log_filter), Ok("debug".to_string()));

        let config = Config::from_lookup(lookup(&[("TODO_LOG", " "), ("RUST_LOG", " ")]));
        assert_eq!(config.map(|c| c.log_filter), Ok(DEFAULT_LOG_FILTER.to_string()));
    }

    #[test]
    fn env_filter_rejects_bad_directives() {
        assert!(Config::default().env_filter().is_ok());

        let config = Config {
            log_filter: "todo=loud".to_string(),
            ..Config::default()
        };
        assert!(config.env_filter().is_err());
    }

    #[test]
    fn feedback_limit_parses() {
        let config = Config::from_lookup(lookup(&[(MAX_FEEDBACK_ENV, " 32 ")]));
        assert_eq!(config.map(|c| c.store.max_feedback_actions), Ok(32));
    }

    #[test]
    fn feedback_limit_rejects_garbage() {
        for bad in ["zero", "0", "-3"] {
            assert_eq!(
                Config::from_lookup(lookup(&[(MAX_FEEDBACK_ENV, bad)])),
                Err(ConfigError::InvalidNumber {
                    var: MAX_FEEDBACK_ENV,
                    value: bad.to_string(),
                })
            );
        }
    }
}
