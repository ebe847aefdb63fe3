//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `relay.bot_token`.
pub const BOT_TOKEN_ENV: &str = "CONTACT_RELAY_BOT_TOKEN";
/// Environment variable overriding `relay.chat_id`.
pub const CHAT_ID_ENV: &str = "CONTACT_RELAY_CHAT_ID";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RelayConfig = toml::from_str(&content)?;
    finish(config)
}

/// Build a config from defaults when no file is given.
pub fn load_default() -> Result<RelayConfig, ConfigError> {
    finish(RelayConfig::default())
}

fn finish(mut config: RelayConfig) -> Result<RelayConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Replace secrets with values from the environment when present.
///
/// Empty variables are ignored.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|v| !v.is_empty()) {
        config.relay.bot_token = token;
    }
    if let Some(chat_id) = lookup(CHAT_ID_ENV).filter(|v| !v.is_empty()) {
        config.relay.chat_id = chat_id;
    }
}
