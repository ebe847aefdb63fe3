//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or defaults
//!     → loader.rs (parse, apply env secret overrides)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → server swaps its relay handle
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Bot credentials come from the environment when set
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_default, ConfigError};
pub use schema::{
    FormConfig, ListenerConfig, MessengerConfig, ObservabilityConfig, RateLimitConfig,
    RelayConfig, TimeoutConfig,
};
pub use validation::ValidationError;
