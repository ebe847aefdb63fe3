//! Telegram Bot API relay.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::MessengerConfig;
use crate::relay::{MessageRelay, RelayError};

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends notifications with `sendMessage` to a fixed chat.
#[derive(Clone)]
pub struct TelegramRelay {
    client: reqwest::Client,
    endpoint: Url,
    chat_id: String,
    parse_mode: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for TelegramRelay {
    // The endpoint embeds the bot token.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramRelay")
            .field("chat_id", &self.chat_id)
            .field("parse_mode", &self.parse_mode)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl TelegramRelay {
    /// Build a relay from configuration.
    pub fn from_config(config: &MessengerConfig) -> Result<Self, RelayError> {
        let base = config.api_base.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{}/bot{}/sendMessage", base, config.bot_token))
            .map_err(|e| RelayError::Config(format!("invalid api_base: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            chat_id: config.chat_id.clone(),
            parse_mode: config.parse_mode.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    async fn deliver(&self, text: &str) -> Result<(), RelayError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: &self.parse_mode,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status.as_u16()));
        }

        let api: ApiResponse = response.json().await.map_err(|e| self.map_transport(e))?;
        if !api.ok {
            return Err(RelayError::Rejected {
                description: api.description.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        Ok(())
    }

    fn map_transport(&self, e: reqwest::Error) -> RelayError {
        if e.is_timeout() {
            RelayError::Timeout(self.timeout_secs)
        } else {
            // Strip the URL: it carries the bot token.
            RelayError::Transport(e.without_url().to_string())
        }
    }
}

impl MessageRelay for TelegramRelay {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(self.deliver(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_token() {
        let config = MessengerConfig {
            api_base: "https://api.telegram.org/".into(),
            bot_token: "123:abc".into(),
            chat_id: "-100".into(),
            ..MessengerConfig::default()
        };

        let relay = TelegramRelay::from_config(&config).unwrap();
        assert_eq!(
            relay.endpoint.as_str(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert!(!format!("{relay:?}").contains("123:abc"));
    }

    #[test]
    fn test_invalid_base_is_config_error() {
        let config = MessengerConfig {
            api_base: "not a url".into(),
            ..MessengerConfig::default()
        };
        assert!(matches!(
            TelegramRelay::from_config(&config),
            Err(RelayError::Config(_))
        ));
    }
}
