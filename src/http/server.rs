//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the relay handlers
//! - Wire up middleware (CORS, tracing, request ID)
//! - Serve the two informational endpoints
//! - Dispatch every other path and method to the forwarder
//! - Swap proxy state when the config watcher delivers an update

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::forward::{carries_body, ForwardError, Forwarder};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};

/// Everything one relayed request needs, rebuilt as a unit on reload.
pub struct ProxyState {
    pub config: ProxyConfig,
    pub forwarder: Forwarder,
}

/// Application state injected into handlers.
///
/// The inner pointer is swapped atomically on config reload; in-flight
/// requests keep the state they loaded.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<ProxyState>>,
}

/// HTTP server for the relay proxy.
pub struct HttpServer {
    router: Router,
    inner: Arc<ArcSwap<ProxyState>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let forwarder = Forwarder::new(&config.upstream)?;
        let inner = Arc::new(ArcSwap::from_pointee(ProxyState { config, forwarder }));

        let state = AppState {
            inner: inner.clone(),
        };
        let router = Self::build_router(state);

        Ok(Self { router, inner })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route(
                "/",
                get(service_info)
                    .post(forward_handler)
                    .put(forward_handler)
                    .patch(forward_handler)
                    .delete(forward_handler),
            )
            .route(
                "/{*path}",
                get(forward_handler)
                    .post(forward_handler)
                    .put(forward_handler)
                    .patch(forward_handler)
                    .delete(forward_handler),
            )
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(CorsLayer::permissive())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl+C or when the shutdown channel fires. Config updates
    /// arriving on `config_updates` replace the proxy state atomically.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Forwarder::new(&config.upstream) {
                    Ok(forwarder) => {
                        tracing::info!(upstream = %config.upstream.base_url, "configuration applied");
                        inner.store(Arc::new(ProxyState { config, forwarder }));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to rebuild forwarder, keeping current configuration");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(crate::lifecycle::shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    docs: &'static str,
    original_api: String,
    usage: &'static str,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    proxy: &'static str,
}

/// `GET /`: static service metadata.
async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let state = state.inner.load_full();
    Json(ServiceInfo {
        message: "TMDB API proxy is running",
        version: env!("CARGO_PKG_VERSION"),
        docs: "https://developer.themoviedb.org/reference",
        original_api: state.config.upstream.base_url.clone(),
        usage: "call TMDB API paths directly, e.g. /movie/popular or /search/movie?query=avengers",
    })
}

/// `GET /health`: liveness. Never calls the upstream.
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        proxy: "running",
    })
}

/// Relay handler for every forwarded path and method.
async fn forward_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    request: Request<Body>,
) -> Result<Json<Value>, ForwardError> {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().trim_start_matches('/').to_string();

    let body_bytes = if carries_body(&parts.method) {
        match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                // An unreadable body is relayed as absent, not failed.
                tracing::warn!(error = %e, "failed to read request body");
                None
            }
        }
    } else {
        None
    };

    let state = state.inner.load_full();
    let value = state
        .forwarder
        .forward(parts.method, &path, &query, &parts.headers, body_bytes)
        .await?;
    Ok(Json(value))
}
