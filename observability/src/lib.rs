//! Logging setup for the k8s-manager MCP server.
//!
//! Structured logging through `tracing`, written to stderr so it never
//! interleaves with protocol traffic on stdout.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogFormat, TracingConfig, TryInitError};
