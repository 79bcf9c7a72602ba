//! # param-guard-config
//!
//! Configuration schema, validation, and loading for the guard.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_ERROR_FLAG_VAR, ENV_ERROR_PAYLOAD_VAR, ENV_PREFIX, ENV_QUERY_NAMESPACE, EnvParseError,
    GuardEnv, apply_env_overrides,
};
pub use load::{
    load_guard_config_from_path, load_guard_config_from_sources, load_guard_config_std_env,
    to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_ERROR_FLAG_VAR, DEFAULT_ERROR_PAYLOAD_VAR,
    DEFAULT_QUERY_PARAM_NAMESPACE, GuardConfig, ValidatedGuardConfig, VariablesConfig,
    parse_guard_config_json, parse_guard_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn default_config_survives_both_formats() -> Result<(), Box<dyn Error>> {
        let config = load_guard_config_from_sources(None, None, &GuardEnv::default())?;
        assert!(!config_crate_version().is_empty());
        assert_eq!(config.variables.query_param_namespace, DEFAULT_QUERY_PARAM_NAMESPACE);
        assert!(config.rules.is_empty());

        let json = to_pretty_json(&config)?;
        assert_eq!(parse_guard_config_json(&json)?, config);

        let toml = to_pretty_toml(&config)?;
        assert_eq!(parse_guard_config_toml(&toml)?, config);
        Ok(())
    }
}
