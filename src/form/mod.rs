//! Contact form processing.
//!
//! # Data Flow
//! ```text
//! SubmissionRequest (raw key/value pairs, aliased keys)
//!     → normalize.rs (trim/collapse whitespace, canonical phone)
//!     → validator.rs (fixed rule order, first failure wins)
//!     → message.rs (HTML-escaped notification text)
//! ```
//!
//! Nothing here does I/O; the HTTP handler and the relay sit around it.

pub mod fields;
pub mod message;
pub mod normalize;
pub mod rules;
pub mod validator;

pub use fields::{FormField, SubmissionRequest};
pub use message::NotificationMessage;
pub use normalize::{normalize_input, normalize_phone};
pub use validator::{validate, NormalizedFields, Rejection, ValidSubmission};
