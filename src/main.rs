//! Contact form relay server.
//!
//! ```text
//!   browser form ──POST──▶ ┌──────────────────────────────────────────┐
//!                          │ request id → trace → timeout → body limit │
//!                          │            → rate limit (per IP)          │
//!                          │                                          │
//!                          │  form: aliases → normalize → validate    │
//!                          │        → HTML message                    │
//!                          │                                          │
//!                          │  relay: Telegram sendMessage ────────────┼──▶ chat
//!                          └──────────────────────────────────────────┘
//!   ◀── {"success": bool, "message": "..."} ──
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use contact_relay::config::{self, watcher::ConfigWatcher};
use contact_relay::http::HttpServer;
use contact_relay::lifecycle::{signals, Shutdown};
use contact_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "contact-relay")]
#[command(about = "Relays website contact-form submissions to a chat", long_about = None)]
struct Args {
    /// Path to the TOML config file. Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the relay settings when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_default()?,
    };

    logging::init_logging(&config.observability);
    tracing::info!("contact-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        form_path = %config.form.path,
        rate_limit = config.rate_limit.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let (config_updates, _watcher) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    signals::wait_for_signal(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
