//! Per-client rate limiting for form submissions.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::http::response::{SubmissionResponse, RATE_LIMITED_MESSAGE};
use crate::observability::metrics::{self, Outcome};

/// A simple token bucket.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn refill(&mut self, capacity: f64, refill_per_sec: f64, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_per_sec).min(capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self, capacity: f64, refill_per_sec: f64, now: Instant) -> bool {
        self.refill(capacity, refill_per_sec, now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Token buckets keyed by client IP.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<IpAddr, TokenBucket>,
    capacity: f64,
    refill_per_sec: f64,
    trusted_proxies: Vec<IpAddr>,
}

impl RateLimiter {
    /// Entries of `trusted_proxies` that are not IP addresses are skipped;
    /// config validation rejects them before this point.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity: f64::from(config.burst_size),
            refill_per_sec: f64::from(config.requests_per_minute) / 60.0,
            trusted_proxies: config
                .trusted_proxies
                .iter()
                .filter_map(|p| p.parse().ok())
                .collect(),
        }
    }

    fn is_trusted(&self, ip: &IpAddr) -> bool {
        self.trusted_proxies.contains(ip)
    }

    /// The address a request is accounted to.
    ///
    /// Forwarding headers are only believed when `peer` is a trusted proxy.
    /// The rightmost `X-Forwarded-For` hop that is not a trusted proxy wins,
    /// then `X-Real-IP`, then the peer itself.
    pub fn client_ip(&self, peer: IpAddr, headers: &HeaderMap) -> IpAddr {
        if !self.is_trusted(&peer) {
            return peer;
        }

        let forwarded = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
            .collect::<Vec<_>>();
        if let Some(ip) = forwarded.into_iter().rev().find(|ip| !self.is_trusted(ip)) {
            return ip;
        }

        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(peer)
    }

    /// Take one token for `ip`. Returns false when the client is over its limit.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        self.buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.capacity, now))
            .try_acquire(self.capacity, self.refill_per_sec, now)
    }

    /// Drop buckets that have refilled completely and been idle for `idle`.
    pub fn prune(&self, idle: Duration) {
        let now = Instant::now();
        self.buckets.retain(|_, bucket| {
            let idle_for = now.saturating_duration_since(bucket.last_update);
            bucket.refill(self.capacity, self.refill_per_sec, now);
            bucket.tokens < self.capacity || idle_for < idle
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }
}

/// Middleware rejecting clients that exceed their submission rate.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let ip = limiter.client_ip(peer, request.headers());

    if limiter.check(ip) {
        next.run(request).await
    } else {
        tracing::warn!(client = %ip, "Rate limit exceeded");
        metrics::record_submission(Outcome::RateLimited);
        SubmissionResponse::failure(RATE_LIMITED_MESSAGE)
            .with_status(StatusCode::TOO_MANY_REQUESTS)
            .into_response()
    }
}
