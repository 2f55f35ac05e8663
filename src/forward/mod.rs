//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (method, path, query, headers, body)
//!     → forwarder.rs (rewrite URL, scrub headers, outbound call)
//!     → upstream API
//!     → 2xx: body parsed as JSON, relayed under inbound 200
//!     → anything else: error.rs (closed error taxonomy → inbound status)
//! ```
//!
//! # Design Decisions
//! - The upstream status code is not propagated on success; callers always
//!   get 200 with the decoded body
//! - Failures map to an exhaustive enum instead of a catch-all, so new
//!   failure modes surface at compile time

pub mod error;
pub mod forwarder;

pub use error::ForwardError;
pub use forwarder::{carries_body, Forwarder, FORWARDED_USER_AGENT};
