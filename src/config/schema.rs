//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the contact relay.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Contact form endpoint settings.
    pub form: FormConfig,

    /// Outbound messaging settings.
    pub relay: MessengerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Contact form endpoint configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Path the form posts to.
    pub path: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            path: "/sendmessage".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Chat-bot API configuration.
///
/// `bot_token` and `chat_id` are secrets; prefer the
/// `CONTACT_RELAY_BOT_TOKEN` / `CONTACT_RELAY_CHAT_ID` environment variables
/// over writing them into the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// Bot API base URL.
    pub api_base: String,

    /// Bot token.
    pub bot_token: String,

    /// Destination chat or channel identifier.
    pub chat_id: String,

    /// Formatting mode passed to the API.
    pub parse_mode: String,

    /// Outbound call timeout in seconds.
    pub timeout_secs: u64,

    /// First line of every notification.
    pub message_title: String,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
            parse_mode: "HTML".to_string(),
            timeout_secs: 10,
            message_title: "Сообщение с сайта БИТ:".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Sustained submissions per minute per client IP.
    pub requests_per_minute: u32,

    /// Burst capacity.
    pub burst_size: u32,

    /// Peers whose `X-Forwarded-For` / `X-Real-IP` headers name the client.
    pub trusted_proxies: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 10,
            burst_size: 5,
            trusted_proxies: vec!["127.0.0.1".to_string(), "::1".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [relay]
            bot_token = "123:abc"
            chat_id = "-100"
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.bot_token, "123:abc");
        assert_eq!(config.relay.parse_mode, "HTML");
        assert_eq!(config.form.path, "/sendmessage");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.trusted_proxies, vec!["127.0.0.1", "::1"]);
    }
}
