//! Config loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{GuardConfig, GuardEnv, ValidatedGuardConfig, apply_env_overrides};
use param_guard_domain::ParamRule;
use param_guard_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the guard config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`GuardEnv`)
/// - overrides JSON (partial config)
/// - config JSON (file content)
/// - defaults (`GuardConfig::default()`)
pub fn load_guard_config_from_sources(
    config_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &GuardEnv,
) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let mut config = match config_json {
        None => GuardConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut config, overrides);
    }

    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

/// Load the guard config from an optional file path.
pub fn load_guard_config_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &GuardEnv,
) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let mut config = match config_path {
        None => GuardConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            tracing::debug!(path = %path.display(), ?format, "loading guard config");
            parse_config_unvalidated(&config_text, format)?
        },
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut config, overrides);
    }

    apply_env_overrides(config, env)
}

/// Load the guard config from std env and an optional file path.
pub fn load_guard_config_std_env(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let env = GuardEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_guard_config_from_path(config_path, overrides_json, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &GuardConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &GuardConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn parse_config_unvalidated(input: &str, format: ConfigFormat) -> Result<GuardConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<GuardConfigOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

/// Partial config; rules listed here replace (or add) rules by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct GuardConfigOverrides {
    version: Option<u32>,
    variables: VariablesConfigOverrides,
    rules: BTreeMap<String, ParamRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct VariablesConfigOverrides {
    query_param_namespace: Option<String>,
    error_flag: Option<String>,
    error_payload: Option<String>,
    prefix: Option<String>,
}

fn apply_overrides(config: &mut GuardConfig, overrides: GuardConfigOverrides) {
    if let Some(version) = overrides.version {
        config.version = version;
    }

    let variables = overrides.variables;
    if let Some(value) = variables.query_param_namespace {
        config.variables.query_param_namespace = value;
    }
    if let Some(value) = variables.error_flag {
        config.variables.error_flag = value;
    }
    if let Some(value) = variables.error_payload {
        config.variables.error_payload = value;
    }
    if let Some(value) = variables.prefix {
        config.variables.prefix = value;
    }

    config.rules.extend(overrides.rules);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENV_ERROR_FLAG_VAR;
    use std::error::Error;

    #[test]
    fn precedence_is_env_then_overrides_then_file() -> Result<(), Box<dyn Error>> {
        let file = r#"{"variables": {"errorFlag": "file.flag", "errorPayload": "file.payload"}}"#;
        let overrides = r#"{"variables": {"errorFlag": "override.flag"}}"#;
        let env = GuardEnv::from_map(&BTreeMap::from([(
            ENV_ERROR_FLAG_VAR.to_string(),
            "env.flag".to_string(),
        )]))?;

        let config = load_guard_config_from_sources(Some(file), Some(overrides), &env)?;
        assert_eq!(config.variables.error_flag, "env.flag");
        assert_eq!(config.variables.error_payload, "file.payload");

        let config = load_guard_config_from_sources(Some(file), Some(overrides), &GuardEnv::default())?;
        assert_eq!(config.variables.error_flag, "override.flag");
        Ok(())
    }

    #[test]
    fn override_rules_replace_by_name() -> Result<(), Box<dyn Error>> {
        let file = r#"{"rules": {"debug": {"kind": "boolean"}, "sort": {"kind": "enum", "values": ["asc"]}}}"#;
        let overrides = r#"{"rules": {"sort": {"kind": "multiEnum", "values": ["a", "b"]}}}"#;

        let config = load_guard_config_from_sources(Some(file), Some(overrides), &GuardEnv::default())?;
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules.get("sort").map(ParamRule::kind), Some("multiEnum"));
        Ok(())
    }

    #[test]
    fn invalid_overrides_are_tagged() -> Result<(), Box<dyn Error>> {
        let error = load_guard_config_from_sources(None, Some("{"), &GuardEnv::default())
            .err()
            .ok_or_else(|| std::io::Error::other("expected overrides error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "invalid_json"));
        assert_eq!(
            error.metadata.get("source").map(String::as_str),
            Some("overrides")
        );
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() -> Result<(), Box<dyn Error>> {
        let path = Path::new("/definitely/not/here/pguard.toml");
        let error = load_guard_config_from_path(Some(path), None, &GuardEnv::default())
            .err()
            .ok_or_else(|| std::io::Error::other("expected io error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "config_file_not_found"));
        assert!(error.metadata.contains_key("path"));
        Ok(())
    }

    #[test]
    fn unsupported_extension_is_rejected() -> Result<(), Box<dyn Error>> {
        let error = detect_config_format(Path::new("guard.yaml"))
            .err()
            .ok_or_else(|| std::io::Error::other("expected format error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "unsupported_format"));
        Ok(())
    }

    #[test]
    fn pretty_output_round_trips() -> Result<(), Box<dyn Error>> {
        let file = r#"{"rules": {"sort": {"kind": "enum", "values": ["asc", "desc"]}}}"#;
        let config = load_guard_config_from_sources(Some(file), None, &GuardEnv::default())?;

        let json = to_pretty_json(&config)?;
        assert!(json.ends_with('\n'));
        assert_eq!(crate::parse_guard_config_json(&json)?, config);

        let toml = to_pretty_toml(&config)?;
        assert!(toml.contains("sort"));
        assert_eq!(crate::parse_guard_config_toml(&toml)?, config);
        Ok(())
    }
}
