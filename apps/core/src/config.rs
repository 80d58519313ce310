//! Environment-driven configuration.
//!
//! Every value has a default except the OpenRouter API key, which is only
//! required when a live client is built.

use crate::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use validator::Validate;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Settings for the chat-completion client.
#[derive(Debug, Clone, Validate)]
pub struct LlmSettings {
    #[validate(url)]
    pub api_url: String,
    pub api_key: Option<String>,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: u32,
    /// Value between 0.0 and 2.0.
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    pub timeout: Duration,
    /// Total attempts for rate-limited requests.
    #[validate(range(min = 1, max = 10))]
    pub max_retries: u32,
    /// First backoff delay; doubles on every retry.
    pub retry_base_delay: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 800,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

/// Monthly rewrite allowance per plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct PlanLimits {
    #[validate(range(min = 1))]
    pub free: u32,
    #[validate(range(min = 1))]
    pub pro: u32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self { free: 20, pro: 1000 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub limits: PlanLimits,
    /// SQLite URL for the usage ledger; in-memory ledger when unset.
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_vars()
    }

    /// Reads the process environment without touching `.env`.
    pub fn from_vars() -> Result<Self, AppError> {
        let defaults = LlmSettings::default();

        let llm = LlmSettings {
            api_url: env::var("OPENROUTER_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("OPENROUTER_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            model: env::var("REALTALK_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_var("REALTALK_MAX_TOKENS", defaults.max_tokens)?,
            temperature: parse_var("REALTALK_TEMPERATURE", defaults.temperature)?,
            timeout: Duration::from_secs(parse_var(
                "REALTALK_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            max_retries: parse_var("REALTALK_MAX_RETRIES", defaults.max_retries)?,
            retry_base_delay: defaults.retry_base_delay,
        };
        llm.validate()?;

        let limits = PlanLimits {
            free: parse_var("FREE_REQUESTS_PER_MONTH", PlanLimits::default().free)?,
            pro: parse_var("PRO_REQUESTS_PER_MONTH", PlanLimits::default().pro)?,
        };
        limits.validate()?;

        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("bunyan") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Self {
            llm,
            limits,
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            log_format,
        };
        debug!(
            "Loaded config: model={}, limits={}/{}, database={}",
            config.llm.model,
            config.limits.free,
            config.limits.pro,
            config.database_url.is_some()
        );
        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 11] = [
        "OPENROUTER_API_URL",
        "OPENROUTER_API_KEY",
        "REALTALK_MODEL",
        "REALTALK_MAX_TOKENS",
        "REALTALK_TEMPERATURE",
        "REALTALK_TIMEOUT_SECS",
        "REALTALK_MAX_RETRIES",
        "FREE_REQUESTS_PER_MONTH",
        "PRO_REQUESTS_PER_MONTH",
        "DATABASE_URL",
        "LOG_FORMAT",
    ];

    type EnvVars = Vec<(&'static str, Option<&'static str>)>;

    /// Every known key unset, except the given overrides.
    fn env_with(overrides: &[(&'static str, &'static str)]) -> EnvVars {
        KEYS.iter()
            .map(|k| {
                let value = overrides.iter().find(|(key, _)| key == k).map(|(_, v)| *v);
                (*k, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(env_with(&[]), || {
            let config = AppConfig::from_vars().expect("defaults load");
            assert_eq!(config.llm.api_url, DEFAULT_API_URL);
            assert_eq!(config.llm.model, DEFAULT_MODEL);
            assert_eq!(config.llm.max_tokens, 800);
            assert_eq!(config.llm.max_retries, 3);
            assert!(config.llm.api_key.is_none());
            assert_eq!(config.limits, PlanLimits { free: 20, pro: 1000 });
            assert_eq!(config.log_format, LogFormat::Pretty);
            assert!(config.database_url.is_none());
        });
    }

    #[test]
    fn test_overrides() {
        let vars = env_with(&[
            ("OPENROUTER_API_KEY", "sk-test"),
            ("FREE_REQUESTS_PER_MONTH", "5"),
            ("REALTALK_TEMPERATURE", "0.2"),
            ("LOG_FORMAT", "json"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]);
        temp_env::with_vars(vars, || {
            let config = AppConfig::from_vars().expect("overrides load");
            assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.limits.free, 5);
            assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
        });
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        temp_env::with_vars(env_with(&[("REALTALK_MAX_TOKENS", "lots")]), || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Config(_))));
        });

        temp_env::with_vars(env_with(&[("REALTALK_TEMPERATURE", "5.0")]), || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Validation(_))));
        });

        temp_env::with_vars(env_with(&[("FREE_REQUESTS_PER_MONTH", "0")]), || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Validation(_))));
        });
    }
}
