//! TMDB API relay proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!  Client Request          ┌──────────────────────────────────────────┐
//!  ────────────────────────┼─▶ http/server ──▶ forward/forwarder ─────┼──▶ TMDB API
//!                          │     │                   │                │
//!  Client Response         │     │  config (schema/loader/validation/ │
//!  ◀───────────────────────┼─────┘          watcher) + lifecycle      │
//!                          └──────────────────────────────────────────┘
//! ```
//!
//! The proxy rewrites every inbound path against the fixed upstream base
//! URL, scrubs the headers, forwards the call, and relays the JSON body.
//! Upstream failures are translated into `{"detail": ...}` error responses.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tmdb_proxy::config::loader::load_config;
use tmdb_proxy::config::watcher::ConfigWatcher;
use tmdb_proxy::config::ProxyConfig;
use tmdb_proxy::http::HttpServer;
use tmdb_proxy::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "tmdb-proxy", about = "Transparent relay proxy for the TMDB REST API", version)]
struct Args {
    /// Host to listen on (overrides the config file).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file).
    #[arg(long)]
    port: Option<u16>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch the configuration file and apply changes without restarting.
    #[arg(long)]
    reload: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(host) = args.host {
        config.listener.host = host;
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    // RUST_LOG wins over the configured level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "tmdb_proxy={level},tower_http={level}",
                    level = config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tmdb-proxy starting");
    tracing::info!(
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.request_timeout_secs,
        "proxy target configured"
    );

    let (config_updates, _watcher) = match (&args.config, args.reload) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            (updates, Some(handle))
        }
        (None, true) => {
            tracing::warn!("--reload requires --config, hot reload disabled");
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let bind_address = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "listening for connections"
    );
    tracing::info!("usage example: GET http://{}/movie/popular", bind_address);

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}
