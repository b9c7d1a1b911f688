//! Configuration management for the FitCoach client
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: FC__)

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::env;

use fitcoach_shared::DAILY_STEP_GOAL;

/// Environment variable consulted when no key is configured
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub logging: LoggingConfig,
    pub goals: GoalsConfig,
}

/// Generation service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset
    pub filter: String,
    /// JSON output instead of pretty output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "fitcoach_client=info".to_string(),
            json: AppConfig::is_production(),
        }
    }
}

/// Daily goals that are not derived from the profile
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
    pub daily_step_goal: u32,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            daily_step_goal: DAILY_STEP_GOAL,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with FC__ prefix
    ///
    /// A missing `ai.api_key` falls back to `GEMINI_API_KEY`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., FC__AI__MODEL=gemini-2.0-flash sets ai.model
            .add_source(
                config::Environment::with_prefix("FC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration ({})", config_file))?;

        let mut loaded: AppConfig = config
            .try_deserialize()
            .context("invalid configuration")?;

        if loaded.ai.api_key.is_none() {
            loaded.ai.api_key = env::var(GEMINI_API_KEY_ENV).ok().map(SecretString::new);
        }

        Ok(loaded)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert_eq!(config.ai.timeout_secs, 30);
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.goals.daily_step_goal, 10_000);
        assert_eq!(config.logging.filter, "fitcoach_client=info");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"ai": {"model": "gemini-2.0-flash"}}"#).unwrap();
        assert_eq!(config.ai.model, "gemini-2.0-flash");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.goals.daily_step_goal, 10_000);
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
