//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, tracing, request ID)
//!     → /        service metadata (GET) or forward to upstream root
//!     → /health  liveness, never touches the upstream
//!     → /{*path} forward via the forward subsystem
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
