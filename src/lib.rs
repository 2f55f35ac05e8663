//! Transparent relay proxy for the TMDB REST API.
//!
//! Accepts any HTTP request, rewrites it against the fixed TMDB base URL,
//! forwards headers, query string and body, and relays the upstream JSON
//! response (or a translated error) back to the caller. Exists so browser
//! clients can reach TMDB without tripping over CORS.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;

pub use config::ProxyConfig;
pub use forward::{ForwardError, Forwarder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
