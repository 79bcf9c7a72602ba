//! Environment variable parsing and env-to-config merging.
//!
//! Env values are strict: a variable-name override that is present but blank
//! fails fast instead of silently falling back to the file value.

use crate::schema::{GuardConfig, ValidatedGuardConfig};
use param_guard_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;

/// Env var: query-parameter namespace.
pub const ENV_QUERY_NAMESPACE: &str = "PGUARD_QUERY_NAMESPACE";
/// Env var: error flag variable name.
pub const ENV_ERROR_FLAG_VAR: &str = "PGUARD_ERROR_FLAG_VAR";
/// Env var: error payload variable name.
pub const ENV_ERROR_PAYLOAD_VAR: &str = "PGUARD_ERROR_PAYLOAD_VAR";
/// Env var: prefix for written variables. An empty value clears the prefix.
pub const ENV_PREFIX: &str = "PGUARD_PREFIX";

const ENV_VARS: [&str; 4] = [
    ENV_QUERY_NAMESPACE,
    ENV_ERROR_FLAG_VAR,
    ENV_ERROR_PAYLOAD_VAR,
    ENV_PREFIX,
];

/// Parsed env overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardEnv {
    /// Query-parameter namespace override.
    pub query_param_namespace: Option<String>,
    /// Error flag variable override.
    pub error_flag_var: Option<String>,
    /// Error payload variable override.
    pub error_payload_var: Option<String>,
    /// Prefix override.
    pub prefix: Option<String>,
}

impl GuardEnv {
    /// Parse overrides from a name/value map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            query_param_namespace: parse_name(map, ENV_QUERY_NAMESPACE)?,
            error_flag_var: parse_name(map, ENV_ERROR_FLAG_VAR)?,
            error_payload_var: parse_name(map, ENV_ERROR_PAYLOAD_VAR)?,
            prefix: map.get(ENV_PREFIX).map(|value| value.trim().to_string()),
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ENV_VARS {
            match std::env::var(name) {
                Ok(value) => {
                    map.insert(name.to_string(), value);
                },
                Err(std::env::VarError::NotPresent) => {},
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(EnvParseError::NotUnicode { var: name });
                },
            }
        }
        Self::from_map(&map)
    }
}

fn parse_name(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed.to_string()))
}

/// Apply env overrides to a base config, then validate and normalize it.
pub fn apply_env_overrides(
    base: GuardConfig,
    env: &GuardEnv,
) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let mut config = base;
    set_if_some(
        &mut config.variables.query_param_namespace,
        env.query_param_namespace.as_ref(),
    );
    set_if_some(&mut config.variables.error_flag, env.error_flag_var.as_ref());
    set_if_some(
        &mut config.variables.error_payload,
        env.error_payload_var.as_ref(),
    );
    set_if_some(&mut config.variables.prefix, env.prefix.as_ref());

    config.validate_and_normalize().map_err(Into::into)
}

fn set_if_some(target: &mut String, value: Option<&String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

/// Env parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    #[error("{var} must not be empty")]
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// An env var holds bytes that are not valid UTF-8.
    #[error("{var} is not valid unicode")]
    NotUnicode {
        /// Env var name.
        var: &'static str,
    },
}

impl EnvParseError {
    const fn var(&self) -> &'static str {
        match self {
            Self::EmptyValue { var } | Self::NotUnicode { var } => var,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "env_empty_value"),
            Self::NotUnicode { .. } => ErrorCode::new("config", "env_not_unicode"),
        }
    }
}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        Self::expected(error.error_code(), error.to_string()).with_metadata("env_var", error.var())
    }
}
