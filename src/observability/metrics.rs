//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contact_submissions_total` (counter): submissions by outcome
//! - `contact_rejections_total` (counter): validation failures by rule
//! - `contact_relay_duration_seconds` (histogram): outbound call latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Final outcome of one request to the form endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    MethodNotAllowed,
    Rejected,
    RelayFailed,
    RateLimited,
    TooLarge,
    TimedOut,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Sent => "sent",
            Outcome::MethodNotAllowed => "method_not_allowed",
            Outcome::Rejected => "rejected",
            Outcome::RelayFailed => "relay_failed",
            Outcome::RateLimited => "rate_limited",
            Outcome::TooLarge => "too_large",
            Outcome::TimedOut => "timed_out",
        }
    }
}

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(outcome: Outcome) {
    counter!("contact_submissions_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_rejection(rule: &'static str) {
    counter!("contact_rejections_total", "rule" => rule).increment(1);
}

pub fn record_relay_duration(start: Instant) {
    histogram!("contact_relay_duration_seconds").record(start.elapsed().as_secs_f64());
}
