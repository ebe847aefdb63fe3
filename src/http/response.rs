//! JSON response contract of the form endpoint.
//!
//! Every answer, success or failure, is `{"success": bool, "message": string}`
//! with the message shown to the visitor as is. Internal error detail never
//! reaches the body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::Rejection;
use crate::observability::metrics::{self, Outcome};
use crate::relay::RelayError;

pub const SENT_MESSAGE: &str = "Сообщение отправлено.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Метод не поддерживается.";
pub const RELAY_FAILED_MESSAGE: &str = "Не удалось отправить сообщение. Попробуйте позже.";
pub const RATE_LIMITED_MESSAGE: &str = "Слишком много запросов. Попробуйте позже.";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Слишком большой запрос.";
pub const REQUEST_TIMEOUT_MESSAGE: &str = "Превышено время ожидания. Попробуйте позже.";

/// Body returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

impl SubmissionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn with_status(self, status: StatusCode) -> JsonReply {
        JsonReply { status, body: self }
    }
}

/// A response body paired with its status code.
#[derive(Debug)]
pub struct JsonReply {
    status: StatusCode,
    body: SubmissionResponse,
}

impl IntoResponse for JsonReply {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                )],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Why a submission did not go through.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request body over the size limit")]
    PayloadTooLarge,

    #[error("validation failed: {0}")]
    Validation(#[from] Rejection),

    #[error("relay failed: {0}")]
    Relay(#[from] RelayError),
}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubmissionError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            SubmissionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubmissionError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the visitor.
    pub fn public_message(&self) -> String {
        match self {
            SubmissionError::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            SubmissionError::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            SubmissionError::Validation(rejection) => rejection.to_string(),
            SubmissionError::Relay(_) => RELAY_FAILED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let mut response = SubmissionResponse::failure(self.public_message())
            .with_status(self.status())
            .into_response();
        if matches!(self, SubmissionError::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

/// Rewrites the bodies of 408 and 413 answers produced by the timeout and
/// body-limit layers, which are plain text or empty, into the JSON contract.
/// Answers that are already JSON pass through.
pub async fn json_error_body(response: Response) -> Response {
    let (message, outcome) = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => (PAYLOAD_TOO_LARGE_MESSAGE, Outcome::TooLarge),
        StatusCode::REQUEST_TIMEOUT => (REQUEST_TIMEOUT_MESSAGE, Outcome::TimedOut),
        _ => return response,
    };
    if is_json(&response) {
        return response;
    }

    tracing::debug!(status = %response.status(), "Replacing middleware error body");
    metrics::record_submission(outcome);
    SubmissionResponse::failure(message)
        .with_status(response.status())
        .into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(SubmissionError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            SubmissionError::from(Rejection::NameTooLong).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            SubmissionError::from(RelayError::Status(502)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_relay_detail_is_hidden() {
        let err = SubmissionError::from(RelayError::Transport("dns failure for api".into()));
        assert_eq!(err.public_message(), RELAY_FAILED_MESSAGE);
    }

    #[test]
    fn test_json_keeps_cyrillic_unescaped() {
        let json = serde_json::to_string(&SubmissionResponse::success(SENT_MESSAGE)).unwrap();
        assert_eq!(json, r#"{"success":true,"message":"Сообщение отправлено."}"#);
    }

    #[tokio::test]
    async fn test_plain_layer_errors_become_json() {
        let plain = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = json_error_body(plain).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: SubmissionResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, SubmissionResponse::failure(PAYLOAD_TOO_LARGE_MESSAGE));

        let empty = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = json_error_body(empty).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: SubmissionResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, REQUEST_TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = json_error_body(StatusCode::NOT_FOUND.into_response()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
