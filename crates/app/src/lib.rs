//! # param-guard-app
//!
//! Query-parameter use cases: accessors over the host context, the
//! validation engine, stock validators, and rule-driven validator building.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod query_params;
pub mod rules;
pub mod validate;
pub mod validators;

pub use query_params::{
    QUERY_PARAM_NAMESPACE, get_query_param, get_query_param_in, get_query_params,
    get_query_params_in, set_query_param, set_query_param_in, set_query_params, set_variable,
    set_variables,
};
pub use rules::build_validators;
pub use validate::{
    ERROR_FLAG_VAR, ERROR_PAYLOAD_VAR, ValidateQueryParamsDeps, ValidationSettings,
    build_validation_report, validate_query_params, validate_query_params_with,
};
pub use validators::{validate_boolean, validate_enum, validate_multiple_enum};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
