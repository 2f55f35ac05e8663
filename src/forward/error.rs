//! Forwarding error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while relaying a request to the upstream API.
///
/// Every failure the forwarder can hit is one of these variants; the
/// boundary matches them exhaustively, so an unclassified failure cannot
/// silently fall through.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The upstream answered with a non-2xx status.
    /// Relayed verbatim: same status code, upstream body in the detail.
    #[error("TMDB API error: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// A connection to the upstream could not be established.
    #[error("could not connect to TMDB API: {0}")]
    Unreachable(String),

    /// The round trip exceeded the request deadline.
    #[error("request to TMDB API timed out: {0}")]
    Timeout(String),

    /// Any other transport-level failure.
    #[error("proxy request failed: {0}")]
    Transport(String),

    /// The upstream returned 2xx but the body was not valid JSON.
    #[error("proxy service error: {0}")]
    Decode(String),
}

impl ForwardError {
    /// Inbound status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::UpstreamStatus { status, .. } => *status,
            ForwardError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Transport(_) | ForwardError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
