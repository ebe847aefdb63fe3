//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router (form endpoint + health)
//! - Wire up middleware (tracing, request ID, timeout, body limit, rate limit)
//! - Serve with graceful shutdown
//! - Apply relay configuration reloads

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    http::StatusCode,
    middleware,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{MessengerConfig, RelayConfig};
use crate::http::handlers::{health, submit_contact};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::json_error_body;
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::relay::{MessageRelay, RelayError, TelegramRelay};
use crate::security::{rate_limit_middleware, RateLimiter};

const PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Everything a submission needs to leave the server. Swapped as a unit on
/// config reload.
pub struct Dispatch {
    pub relay: Arc<dyn MessageRelay>,
    pub message_title: String,
}

impl Dispatch {
    pub fn new(relay: Arc<dyn MessageRelay>, message_title: impl Into<String>) -> Self {
        Self {
            relay,
            message_title: message_title.into(),
        }
    }

    /// Build a Telegram-backed dispatch.
    pub fn from_config(config: &MessengerConfig) -> Result<Self, RelayError> {
        let relay = TelegramRelay::from_config(config)?;
        Ok(Self::new(Arc::new(relay), config.message_title.clone()))
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatch: Arc<ArcSwap<Dispatch>>,
}

/// HTTP server for the contact form.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    state: AppState,
    limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a server relaying to the Telegram chat named in `config`.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let dispatch = Dispatch::from_config(&config.relay)?;
        Ok(Self::with_dispatch(config, dispatch))
    }

    /// Create a server with a caller-supplied relay.
    pub fn with_relay(config: RelayConfig, relay: Arc<dyn MessageRelay>) -> Self {
        let dispatch = Dispatch::new(relay, config.relay.message_title.clone());
        Self::with_dispatch(config, dispatch)
    }

    fn with_dispatch(config: RelayConfig, dispatch: Dispatch) -> Self {
        let state = AppState {
            dispatch: Arc::new(ArcSwap::from_pointee(dispatch)),
        };
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::new(&config.rate_limit)));

        let router = Self::build_router(&config, state.clone(), limiter.clone());
        Self {
            router,
            config,
            state,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState, limiter: Option<Arc<RateLimiter>>) -> Router {
        let mut contact = any(submit_contact);
        if let Some(limiter) = limiter {
            contact = contact.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        Router::new()
            .route(&config.form.path, contact)
            .route("/health", get(health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.form.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(middleware::map_response(json_error_body))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the relay; changes to any
    /// other section need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.form.path,
            "HTTP server starting"
        );

        let dispatch = self.state.dispatch.clone();
        let active = self.config.clone();
        let reloader = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_reload(&dispatch, &active, &new_config);
            }
        });

        let pruner = self.limiter.clone().map(|limiter| {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(PRUNE_INTERVAL);
                loop {
                    interval.tick().await;
                    limiter.prune(PRUNE_INTERVAL);
                }
            })
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        reloader.abort();
        if let Some(pruner) = pruner {
            pruner.abort();
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn apply_reload(dispatch: &ArcSwap<Dispatch>, active: &RelayConfig, new_config: &RelayConfig) {
    let pending = restart_required(active, new_config);
    if !pending.is_empty() {
        tracing::warn!(sections = ?pending, "Config sections changed that only apply after a restart");
    }

    match Dispatch::from_config(&new_config.relay) {
        Ok(new_dispatch) => {
            dispatch.store(Arc::new(new_dispatch));
            tracing::info!(chat_id = %new_config.relay.chat_id, "Relay configuration reloaded");
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected relay reload, keeping current relay");
        }
    }
}

/// Sections of `new_config` that differ from the running config and are
/// baked into the listener or router.
fn restart_required(active: &RelayConfig, new_config: &RelayConfig) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if new_config.listener != active.listener {
        sections.push("listener");
    }
    if new_config.form != active.form {
        sections.push("form");
    }
    if new_config.timeouts != active.timeouts {
        sections.push("timeouts");
    }
    if new_config.rate_limit != active.rate_limit {
        sections.push("rate_limit");
    }
    if new_config.observability != active.observability {
        sections.push("observability");
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_changes_apply_live() {
        let active = RelayConfig::default();
        let mut new_config = active.clone();
        new_config.relay.chat_id = "-2002".into();

        assert!(restart_required(&active, &new_config).is_empty());
    }

    #[test]
    fn test_restart_sections_are_reported() {
        let active = RelayConfig::default();
        let mut new_config = active.clone();
        new_config.form.max_body_bytes = 1024;
        new_config.timeouts.request_secs = 5;
        new_config.rate_limit.burst_size = 1;

        assert_eq!(
            restart_required(&active, &new_config),
            vec!["form", "timeouts", "rate_limit"]
        );
    }
}
