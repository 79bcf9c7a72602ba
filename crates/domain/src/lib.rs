//! # param-guard-domain
//!
//! Domain model for gateway query-parameter validation.
//!
//! This crate contains the core types with no infrastructure dependencies:
//!
//! - **Values** - `VariableValue` as stored in the host context
//! - **Params** - `QueryParams`, an insertion-ordered collection
//! - **Outcomes** - `ValidatorOutcome`, the tagged validator result
//! - **Reports** - `ErrorRecord`, `ErrorPayload`, `ValidationReport`
//! - **Validators** - `ParamValidator` and the `Validators` registry
//! - **Rules** - `ParamRule`, declarative validators
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use param_guard_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod outcome;
pub mod params;
pub mod report;
pub mod rule;
pub mod validator;
pub mod value;

pub use outcome::ValidatorOutcome;
pub use params::{QUERY_PARAM_NAMESPACE, QueryParams};
pub use report::{
    EmptyPayload, ErrorPayload, ErrorRecord, InvalidPayload, PAYLOAD_MESSAGE, PAYLOAD_STATUS_CODE,
    PAYLOAD_TITLE, ValidationReport, default_message,
};
pub use rule::ParamRule;
pub use validator::{ParamValidator, Validators};
pub use value::VariableValue;

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        let version = domain_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn domain_depends_on_shared() {
        let shared_version = shared_crate_version();
        assert!(!shared_version.is_empty());
    }
}
