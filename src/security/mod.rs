//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request to the form endpoint:
//!     → RequestBodyLimitLayer (413 above form.max_body_bytes)
//!     → rate_limit.rs (per-IP token bucket, 429)
//!     → contact handler
//! ```

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
