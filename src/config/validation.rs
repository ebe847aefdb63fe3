//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! All problems are reported, not just the first one.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a fully-deserialized config.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if !config.form.path.starts_with('/') {
        errors.push(ValidationError::new("form.path", "must start with '/'"));
    } else if config.form.path == "/health" {
        errors.push(ValidationError::new("form.path", "'/health' is reserved"));
    }
    if config.form.max_body_bytes == 0 {
        errors.push(ValidationError::new("form.max_body_bytes", "must be > 0"));
    }

    if let Err(e) = url::Url::parse(&config.relay.api_base) {
        errors.push(ValidationError::new("relay.api_base", e.to_string()));
    }
    if config.relay.bot_token.trim().is_empty() {
        errors.push(ValidationError::new("relay.bot_token", "is empty"));
    }
    if config.relay.chat_id.trim().is_empty() {
        errors.push(ValidationError::new("relay.chat_id", "is empty"));
    }
    if config.relay.timeout_secs == 0 {
        errors.push(ValidationError::new("relay.timeout_secs", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_minute == 0 {
            errors.push(ValidationError::new(
                "rate_limit.requests_per_minute",
                "must be > 0 when rate limiting is enabled",
            ));
        }
        if config.rate_limit.burst_size == 0 {
            errors.push(ValidationError::new(
                "rate_limit.burst_size",
                "must be > 0 when rate limiting is enabled",
            ));
        }
        for proxy in &config.rate_limit.trusted_proxies {
            if proxy.parse::<IpAddr>().is_err() {
                errors.push(ValidationError::new(
                    "rate_limit.trusted_proxies",
                    format!("'{proxy}' is not an IP address"),
                ));
            }
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.relay.bot_token = "123:abc".into();
        config.relay.chat_id = "-100".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = valid();
        config.relay.bot_token.clear();
        config.relay.chat_id = "  ".into();
        config.form.path = "sendmessage".into();
        config.relay.api_base = "not a url".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["form.path", "relay.api_base", "relay.bot_token", "relay.chat_id"]
        );
    }

    #[test]
    fn test_rate_limit_values_ignored_when_disabled() {
        let mut config = valid();
        config.rate_limit.enabled = false;
        config.rate_limit.burst_size = 0;
        assert!(validate_config(&config).is_ok());

        config.rate_limit.enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_trusted_proxies_must_be_ips() {
        let mut config = valid();
        config.rate_limit.trusted_proxies = vec!["10.0.0.1".into(), "proxy.local".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "rate_limit.trusted_proxies");
        assert!(errors[0].reason.contains("proxy.local"));
    }
}
