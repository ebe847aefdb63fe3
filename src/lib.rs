//! Contact form relay library.
//!
//! Validates website contact-form submissions and forwards them to a chat
//! through a bot API.

pub mod config;
pub mod form;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod security;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
