//! Lifecycle management subsystem.
//!
//! Startup is orchestrated by the binary (config first, then the server);
//! shutdown is coordinated here so tests and signal handling share one
//! mechanism.

pub mod shutdown;

pub use shutdown::Shutdown;
