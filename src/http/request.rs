//! Request handling: request IDs and form body extraction.

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    Form,
};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::form::SubmissionRequest;
use crate::http::response::SubmissionError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Assigns an `x-request-id` to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<UuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), UuidRequestId)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Read the submitted fields from a multipart or urlencoded body.
///
/// A body over the size limit is an error. Any other unreadable body,
/// including a multipart body that breaks off part way, yields an empty
/// submission; the validator then reports the missing required fields.
pub async fn read_submission(request: Request<Body>) -> Result<SubmissionRequest, SubmissionError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unreadable multipart body");
                Ok(SubmissionRequest::new())
            }
        }
    } else {
        match Form::<Vec<(String, String)>>::from_request(request, &()).await {
            Ok(Form(pairs)) => Ok(pairs.into_iter().collect()),
            Err(rejection) => discard(rejection.status(), &rejection, "Unreadable form body"),
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<SubmissionRequest, SubmissionError> {
    let mut submission = SubmissionRequest::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(submission),
            Err(e) => return discard(e.status(), &e, "Malformed multipart body"),
        };
        // Uploaded files are not form values.
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field.text().await {
            Ok(value) => submission.insert(name, value),
            Err(e) => return discard(e.status(), &e, "Unreadable multipart field"),
        }
    }
}

/// Drop the whole body. Only the size limit is reported as its own error.
fn discard(
    status: StatusCode,
    error: &dyn std::fmt::Display,
    what: &'static str,
) -> Result<SubmissionRequest, SubmissionError> {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(SubmissionError::PayloadTooLarge);
    }
    tracing::debug!(error = %error, "{what}");
    Ok(SubmissionRequest::new())
}
