//! Outbound notification delivery.
//!
//! # Data Flow
//! ```text
//! NotificationMessage::text()
//!     → MessageRelay::send (trait object held by the HTTP state)
//!     → telegram.rs (Bot API sendMessage over HTTPS)
//! ```
//!
//! # Design Decisions
//! - Narrow interface: one text blob in, success or failure out
//! - Single attempt; a form POST is not idempotent so nothing is retried
//! - Every outbound call has a timeout

pub mod telegram;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub use telegram::TelegramRelay;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Network or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not finish in time.
    #[error("relay timed out after {0} seconds")]
    Timeout(u64),

    /// The API answered with a non-success HTTP status.
    #[error("messaging API returned status {0}")]
    Status(u16),

    /// The API answered but refused the message.
    #[error("messaging API rejected the message: {description}")]
    Rejected { description: String },

    /// The relay could not be built from its configuration.
    #[error("relay configuration error: {0}")]
    Config(String),
}

/// Something that can deliver a formatted notification.
pub trait MessageRelay: Send + Sync {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), RelayError>>;
}
