//! Endpoint handlers.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::form::{validate, NotificationMessage};
use crate::http::request::{read_submission, request_id};
use crate::http::response::{SubmissionError, SubmissionResponse, SENT_MESSAGE};
use crate::http::server::AppState;
use crate::observability::metrics::{self, Outcome};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Contact form endpoint. Accepts any method so non-POST requests get the
/// JSON 405 body instead of an empty one.
pub async fn submit_contact(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(request.headers()).to_owned();

    match process(&state, request).await {
        Ok(()) => {
            tracing::info!(request_id = %request_id, "Submission relayed");
            metrics::record_submission(Outcome::Sent);
            SubmissionResponse::success(SENT_MESSAGE)
                .with_status(StatusCode::OK)
                .into_response()
        }
        Err(err) => {
            match &err {
                SubmissionError::MethodNotAllowed => {
                    tracing::debug!(request_id = %request_id, "Wrong method on form endpoint");
                    metrics::record_submission(Outcome::MethodNotAllowed);
                }
                SubmissionError::PayloadTooLarge => {
                    tracing::info!(request_id = %request_id, "Form body over the size limit");
                    metrics::record_submission(Outcome::TooLarge);
                }
                SubmissionError::Validation(rejection) => {
                    tracing::info!(request_id = %request_id, rule = rejection.rule(), "Submission rejected");
                    metrics::record_rejection(rejection.rule());
                    metrics::record_submission(Outcome::Rejected);
                }
                SubmissionError::Relay(e) => {
                    tracing::error!(request_id = %request_id, error = %e, "Relay failed");
                    metrics::record_submission(Outcome::RelayFailed);
                }
            }
            err.into_response()
        }
    }
}

async fn process(state: &AppState, request: Request<Body>) -> Result<(), SubmissionError> {
    if request.method() != Method::POST {
        return Err(SubmissionError::MethodNotAllowed);
    }

    let submission = read_submission(request).await?;
    let valid = validate(&submission)?;

    let dispatch = state.dispatch.load_full();
    let text = NotificationMessage::from_submission(&valid, &dispatch.message_title).text();

    let start = Instant::now();
    let result = dispatch.relay.send(&text).await;
    metrics::record_relay_duration(start);
    result?;

    Ok(())
}
