//! The forwarder: one outbound call per inbound request.

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::config::UpstreamConfig;
use crate::forward::error::ForwardError;

/// User-Agent presented to the upstream regardless of the inbound value.
pub const FORWARDED_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Whether this method conventionally carries a payload.
///
/// GET and DELETE bodies are never read or forwarded.
pub fn carries_body(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT || method == Method::PATCH
}

/// Issues outbound calls against the fixed upstream base URL.
///
/// Holds the shared keep-alive pool and the outbound concurrency cap; safe
/// to share across all inbound requests.
pub struct Forwarder {
    client: reqwest::Client,
    base_url: String,
    limit: Semaphore,
}

impl Forwarder {
    /// Build a forwarder from upstream settings.
    ///
    /// The client verifies TLS certificates, follows redirects, and applies
    /// the configured timeout to the whole round trip.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_connections)
            .redirect(reqwest::redirect::Policy::limited(10))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: Semaphore::new(config.max_connections),
        })
    }

    /// Relay one request to the upstream and decode the JSON response.
    ///
    /// On success the upstream status is discarded and only the decoded body
    /// is returned; callers answer with their own 200. Failures are
    /// classified into [`ForwardError`].
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: &HashMap<String, String>,
        headers: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Value, ForwardError> {
        let target_url = self.target_url(path);
        let outbound_headers = sanitize_headers(headers);

        tracing::info!(
            method = %method,
            url = %target_url,
            query = ?query,
            "forwarding request"
        );

        let _permit = self
            .limit
            .acquire()
            .await
            .expect("outbound connection semaphore closed");

        let mut request = self
            .client
            .request(method.clone(), &target_url)
            .headers(outbound_headers)
            .query(query);

        if carries_body(&method) {
            if let Some(body) = body {
                request = request.body(body);
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            // A connect timeout reports both; the deadline takes precedence.
            Err(e) if e.is_timeout() => return Err(ForwardError::Timeout(e.to_string())),
            Err(e) if e.is_connect() => return Err(ForwardError::Unreachable(e.to_string())),
            Err(e) => return Err(ForwardError::Transport(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "upstream returned error status");
            return Err(ForwardError::UpstreamStatus { status, body });
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "upstream body was not valid JSON");
            ForwardError::Decode(e.to_string())
        })
    }

    /// Rewrite an inbound path against the upstream base URL.
    ///
    /// Leading slashes are stripped so the result is never double-slashed;
    /// an empty path targets the upstream root.
    fn target_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Prepare inbound headers for the outbound call.
///
/// `host` and `content-length` are dropped (the client sets its own), and
/// `User-Agent` is replaced with the fixed browser string. Applying this
/// twice yields the same result.
fn sanitize_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(FORWARDED_USER_AGENT),
    );
    headers
}
