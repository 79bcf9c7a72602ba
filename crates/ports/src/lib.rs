//! # param-guard-ports
//!
//! Port traits for the param-guard hexagonal architecture.
//!
//! This crate defines the interfaces between the validation engine and the
//! gateway host. It depends only on `domain` and `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod variables;

pub use logger::*;
pub use variables::*;

// Re-export domain types used in port signatures, so adapter crates can
// implement ports without directly depending on `param-guard-domain`.
pub use param_guard_domain::VariableValue;
