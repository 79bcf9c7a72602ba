//! # param-guard-adapters
//!
//! Adapter implementations for ports (variable store, logging).
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod log_sink;
pub mod logger;
pub mod tracing_logger;
pub mod variables;

pub use log_sink::{LogSink, MemoryLogSink};
pub use logger::JsonLogger;
pub use tracing_logger::TracingLogger;
pub use variables::{InMemoryVariableStore, parse_query_string, parse_url_query};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
