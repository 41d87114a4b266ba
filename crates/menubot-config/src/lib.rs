//! Environment configuration for menubot.
//!
//! [`Settings`] gathers everything the server needs from the process
//! environment. Call `dotenvy::dotenv()` before [`Settings::from_env`] so a
//! local `.env` file is honoured.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GOOGLE_API_KEY` | empty |
//! | `MENUBOT_MODEL` | `models/gemini-2.5-flash` |
//! | `MENUBOT_API_BASE` | unset (native Gemini API) |
//! | `MENUBOT_MAX_OUTPUT_TOKENS` | `2048` |
//! | `MENUBOT_TEMPERATURE` | `0.7` |
//! | `MENUBOT_MAX_ITERATIONS` | `1` |
//! | `MENUBOT_BIND_ADDR` | `0.0.0.0:3000` |
//!
//! # Example
//!
//! ```rust
//! use menubot_config::Settings;
//!
//! let settings = Settings::from_lookup(|var| match var {
//!     "GOOGLE_API_KEY" => Some("key".to_string()),
//!     "MENUBOT_TEMPERATURE" => Some("0.2".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(settings.model.temperature, 0.2);
//! assert_eq!(settings.bind_addr, "0.0.0.0:3000");
//! ```

use std::str::FromStr;

use menubot_core::ModelConfig;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_ITERATIONS: usize = 1;

/// Errors that can occur when reading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A variable was set but could not be used.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Creates an invalid-value error.
    pub fn invalid(var: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var: var.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Runtime settings for the server and agent.
#[derive(Debug, Clone)]
pub struct Settings {
    /// LLM configuration handed to the agent.
    pub model: ModelConfig,
    /// Tool-calling iteration budget for each chat request.
    pub max_iterations: usize,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads settings through the given lookup function.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GOOGLE_API_KEY").unwrap_or_else(|| {
            warn!("GOOGLE_API_KEY is not set; provider calls will be rejected");
            String::new()
        });

        let mut model = ModelConfig::new(
            get("MENUBOT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
        );
        model.api_base = get("MENUBOT_API_BASE");
        model.max_output_tokens = parse_or(&get, "MENUBOT_MAX_OUTPUT_TOKENS", model.max_output_tokens)?;
        model.temperature = parse_or(&get, "MENUBOT_TEMPERATURE", model.temperature)?;

        let max_iterations = parse_or(&get, "MENUBOT_MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?;
        if max_iterations == 0 {
            return Err(ConfigError::invalid("MENUBOT_MAX_ITERATIONS", "0", "must be at least 1"));
        }

        Ok(Self {
            model,
            max_iterations,
            bind_addr: get("MENUBOT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

fn parse_or<T, G>(get: &G, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, raw.clone(), e.to_string())),
    }
}
