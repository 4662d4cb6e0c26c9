//! Application configuration
//!
//! Centralized configuration loaded from environment variables at startup.
//! API credentials are required: their absence is a fatal error reported
//! before any work starts. Everything else has a sensible default.

use crate::error::OrchestratorError;
use std::env;

/// Default OpenAI-compatible API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default evaluation service base URL
pub const DEFAULT_EVAL_BASE_URL: &str = "https://api.judgmentlabs.ai";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Evaluation service configuration
    pub eval: EvalConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (from `OPENAI_API_KEY`, required)
    pub api_key: String,
    /// Chat model name (from `OPENAI_MODEL`)
    pub model: String,
    /// API base URL (from `OPENAI_BASE_URL`)
    pub base_url: String,
}

/// Evaluation service configuration
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// API key (from `JUDGMENT_API_KEY`, required)
    pub api_key: String,
    /// Evaluation API base URL (from `JUDGMENT_API_URL`)
    pub base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Returns
    /// * `Ok(Config)` - Validated configuration
    /// * `Err(OrchestratorError::Configuration)` - If a required credential
    ///   is missing or empty
    pub fn from_env() -> Result<Self, OrchestratorError> {
        Ok(Self {
            llm: LlmConfig {
                api_key: require_env("OPENAI_API_KEY")?,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            },
            eval: EvalConfig {
                api_key: require_env("JUDGMENT_API_KEY")?,
                base_url: env::var("JUDGMENT_API_URL")
                    .unwrap_or_else(|_| DEFAULT_EVAL_BASE_URL.to_string()),
            },
        })
    }
}

/// Read a required environment variable, rejecting empty values
fn require_env(name: &str) -> Result<String, OrchestratorError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(OrchestratorError::Configuration(format!(
            "{} environment variable is not set or is empty",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Run `f` with the given env vars set, restoring originals afterwards
    fn with_env_vars(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let originals: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(name, _)| (name.to_string(), env::var(name).ok()))
            .collect();

        for (name, value) in vars {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }

        f();

        for (name, original) in originals {
            match original {
                Some(v) => env::set_var(&name, v),
                None => env::remove_var(&name),
            }
        }
    }

    #[test]
    #[serial]
    fn test_from_env_missing_llm_key() {
        with_env_vars(
            &[("OPENAI_API_KEY", None), ("JUDGMENT_API_KEY", Some("jl-x"))],
            || {
                let result = Config::from_env();
                assert!(result.is_err());
                let msg = result.unwrap_err().to_string();
                assert!(msg.contains("OPENAI_API_KEY"), "got: {}", msg);
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_empty_llm_key() {
        with_env_vars(
            &[("OPENAI_API_KEY", Some("")), ("JUDGMENT_API_KEY", Some("jl-x"))],
            || {
                let result = Config::from_env();
                assert!(result.is_err());
                assert!(result.unwrap_err().to_string().contains("OPENAI_API_KEY"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_missing_eval_key() {
        with_env_vars(
            &[("OPENAI_API_KEY", Some("sk-x")), ("JUDGMENT_API_KEY", None)],
            || {
                let result = Config::from_env();
                assert!(result.is_err());
                assert!(result.unwrap_err().to_string().contains("JUDGMENT_API_KEY"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_applied() {
        with_env_vars(
            &[
                ("OPENAI_API_KEY", Some("sk-x")),
                ("JUDGMENT_API_KEY", Some("jl-x")),
                ("OPENAI_MODEL", None),
                ("OPENAI_BASE_URL", None),
                ("JUDGMENT_API_URL", None),
            ],
            || {
                let config = Config::from_env().expect("config should load");
                assert_eq!(config.llm.model, DEFAULT_MODEL);
                assert_eq!(config.llm.base_url, DEFAULT_OPENAI_BASE_URL);
                assert_eq!(config.eval.base_url, DEFAULT_EVAL_BASE_URL);
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        with_env_vars(
            &[
                ("OPENAI_API_KEY", Some("sk-x")),
                ("JUDGMENT_API_KEY", Some("jl-x")),
                ("OPENAI_MODEL", Some("gpt-4o")),
                ("OPENAI_BASE_URL", Some("http://localhost:9999/v1")),
            ],
            || {
                let config = Config::from_env().expect("config should load");
                assert_eq!(config.llm.model, "gpt-4o");
                assert_eq!(config.llm.base_url, "http://localhost:9999/v1");
            },
        );
    }
}
