//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, multipart/urlencoded body → SubmissionRequest)
//!     → handlers.rs (method check, validation, relay)
//!     → response.rs (JSON {success, message} + status)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{SubmissionError, SubmissionResponse};
pub use server::{AppState, Dispatch, HttpServer};
