//! Guard configuration schema, validation, and normalization.

use param_guard_domain::{ParamRule, QUERY_PARAM_NAMESPACE};
use param_guard_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Current config schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default namespace for query-parameter variables.
pub const DEFAULT_QUERY_PARAM_NAMESPACE: &str = QUERY_PARAM_NAMESPACE;
/// Default variable holding the boolean error flag.
pub const DEFAULT_ERROR_FLAG_VAR: &str = "error";
/// Default variable holding the serialized error payload.
pub const DEFAULT_ERROR_PAYLOAD_VAR: &str = "errorpayload";

const RULES_MAX: usize = 512;
const RULE_VALUES_MAX: usize = 1024;

/// Top-level guard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct GuardConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Host variable naming.
    pub variables: VariablesConfig,
    /// Declarative rules keyed by query-parameter name.
    pub rules: BTreeMap<String, ParamRule>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            variables: VariablesConfig::default(),
            rules: BTreeMap::new(),
        }
    }
}

impl GuardConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedGuardConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.variables.normalize();
        self.variables.validate()?;
        normalize_rules(&mut self.rules)?;

        Ok(ValidatedGuardConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Names of the host variables read and written by the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct VariablesConfig {
    /// Namespace prepended to every query-parameter name.
    pub query_param_namespace: String,
    /// Variable receiving the boolean error flag.
    pub error_flag: String,
    /// Variable receiving the JSON error payload.
    pub error_payload: String,
    /// Prefix applied to every written variable. May be empty.
    pub prefix: String,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            query_param_namespace: DEFAULT_QUERY_PARAM_NAMESPACE.to_string(),
            error_flag: DEFAULT_ERROR_FLAG_VAR.to_string(),
            error_payload: DEFAULT_ERROR_PAYLOAD_VAR.to_string(),
            prefix: String::new(),
        }
    }
}

impl VariablesConfig {
    fn normalize(&mut self) {
        trim_in_place(&mut self.query_param_namespace);
        trim_in_place(&mut self.error_flag);
        trim_in_place(&mut self.error_payload);
        trim_in_place(&mut self.prefix);
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        for (field, value) in [
            ("queryParamNamespace", &self.query_param_namespace),
            ("errorFlag", &self.error_flag),
            ("errorPayload", &self.error_payload),
        ] {
            if value.is_empty() {
                return Err(ConfigSchemaError::EmptyVariableName { field });
            }
        }

        if self.error_flag == self.error_payload {
            return Err(ConfigSchemaError::VariableCollision {
                name: self.error_flag.clone(),
            });
        }
        Ok(())
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn normalize_rules(rules: &mut BTreeMap<String, ParamRule>) -> Result<(), ConfigSchemaError> {
    if rules.len() > RULES_MAX {
        return Err(ConfigSchemaError::TooManyRules {
            len: rules.len(),
            max: RULES_MAX,
        });
    }

    // Keys are matched against raw parameter names, so they are trimmed too.
    let mut normalized = BTreeMap::new();
    for (param, mut rule) in std::mem::take(rules) {
        let param = param.trim();
        if param.is_empty() {
            return Err(ConfigSchemaError::EmptyRuleName);
        }
        normalize_rule_values(param, &mut rule)?;
        if normalized.insert(param.to_string(), rule).is_some() {
            return Err(ConfigSchemaError::DuplicateRuleName {
                param: param.to_string(),
            });
        }
    }
    *rules = normalized;
    Ok(())
}

fn normalize_rule_values(param: &str, rule: &mut ParamRule) -> Result<(), ConfigSchemaError> {
    let kind = rule.kind();
    match rule {
        ParamRule::Boolean => {},
        ParamRule::Enum { values } | ParamRule::MultiEnum { values } => {
            if values.is_empty() {
                return Err(ConfigSchemaError::EmptyRuleValues {
                    param: param.to_string(),
                    kind,
                });
            }
            if values.len() > RULE_VALUES_MAX {
                return Err(ConfigSchemaError::TooManyRuleValues {
                    param: param.to_string(),
                    len: values.len(),
                    max: RULE_VALUES_MAX,
                });
            }
            dedupe_preserving_order(values);
        },
    }
    Ok(())
}

fn dedupe_preserving_order(values: &mut Vec<String>) {
    let mut seen = BTreeSet::new();
    values.retain(|value| seen.insert(value.clone()));
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGuardConfig {
    raw: GuardConfig,
}

impl ValidatedGuardConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &GuardConfig {
        &self.raw
    }
}

impl AsRef<GuardConfig> for ValidatedGuardConfig {
    fn as_ref(&self) -> &GuardConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedGuardConfig {
    type Target = GuardConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a guard config from a JSON string, applying validation and normalization.
pub fn parse_guard_config_json(input: &str) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let config: GuardConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a guard config from a TOML string, applying validation and normalization.
pub fn parse_guard_config_toml(input: &str) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let config: GuardConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A required variable name is empty.
    EmptyVariableName {
        /// Field name in the config file (e.g. `errorFlag`).
        field: &'static str,
    },
    /// The error flag and payload would overwrite each other.
    VariableCollision {
        /// Shared variable name.
        name: String,
    },
    /// A rule is keyed by a blank parameter name.
    EmptyRuleName,
    /// Two rule keys name the same parameter once trimmed.
    DuplicateRuleName {
        /// Trimmed parameter name.
        param: String,
    },
    /// An enum rule lists no values.
    EmptyRuleValues {
        /// Parameter name.
        param: String,
        /// Rule kind.
        kind: &'static str,
    },
    /// Too many rules.
    TooManyRules {
        /// Number of rules.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// An enum rule lists too many values.
    TooManyRuleValues {
        /// Parameter name.
        param: String,
        /// Number of values.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::EmptyVariableName { .. } | Self::VariableCollision { .. } => {
                ErrorCode::new("config", "invalid_variable_name")
            },
            Self::EmptyRuleName | Self::DuplicateRuleName { .. } | Self::EmptyRuleValues { .. } => {
                ErrorCode::new("config", "invalid_rule")
            },
            Self::TooManyRules { .. } | Self::TooManyRuleValues { .. } => {
                ErrorCode::new("config", "list_too_large")
            },
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::EmptyVariableName { field } => {
                write!(formatter, "variables.{field} must not be empty")
            },
            Self::VariableCollision { name } => write!(
                formatter,
                "variables.errorFlag and variables.errorPayload must differ (both are `{name}`)"
            ),
            Self::EmptyRuleName => formatter.write_str("rule names must not be blank"),
            Self::DuplicateRuleName { param } => {
                write!(formatter, "rules.{param}: defined more than once")
            },
            Self::EmptyRuleValues { param, kind } => {
                write!(formatter, "rules.{param}: `{kind}` rule needs at least one value")
            },
            Self::TooManyRules { len, max } => {
                write!(formatter, "too many rules: {len} (max {max})")
            },
            Self::TooManyRuleValues { param, len, max } => {
                write!(formatter, "rules.{param}: too many values: {len} (max {max})")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => {
                envelope = envelope
                    .with_metadata("found", found.to_string())
                    .with_metadata("supported", supported.to_string());
            },
            ConfigSchemaError::EmptyVariableName { field } => {
                envelope = envelope
                    .with_metadata("section", "variables")
                    .with_metadata("field", field);
            },
            ConfigSchemaError::VariableCollision { name } => {
                envelope = envelope
                    .with_metadata("section", "variables")
                    .with_metadata("name", name);
            },
            ConfigSchemaError::EmptyRuleName => {
                envelope = envelope.with_metadata("section", "rules");
            },
            ConfigSchemaError::DuplicateRuleName { param } => {
                envelope = envelope
                    .with_metadata("section", "rules")
                    .with_metadata("param", param);
            },
            ConfigSchemaError::EmptyRuleValues { param, kind } => {
                envelope = envelope
                    .with_metadata("section", "rules")
                    .with_metadata("param", param)
                    .with_metadata("kind", kind);
            },
            ConfigSchemaError::TooManyRules { len, max } => {
                envelope = envelope
                    .with_metadata("section", "rules")
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
            ConfigSchemaError::TooManyRuleValues { param, len, max } => {
                envelope = envelope
                    .with_metadata("section", "rules")
                    .with_metadata("param", param)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
        }

        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn defaults_are_applied() -> Result<(), Box<dyn Error>> {
        let config = parse_guard_config_json("{}")?;

        assert_eq!(config.version, CURRENT_CONFIG_VERSION);
        assert_eq!(config.variables, VariablesConfig::default());
        assert_eq!(config.variables.query_param_namespace, "request.queryparam.");
        assert_eq!(config.variables.error_flag, "error");
        assert_eq!(config.variables.error_payload, "errorpayload");
        assert!(config.variables.prefix.is_empty());
        assert!(config.rules.is_empty());
        Ok(())
    }

    #[test]
    fn unsupported_version_returns_error_code() -> Result<(), Box<dyn Error>> {
        let error = parse_guard_config_json(r#"{"version": 2}"#)
            .err()
            .ok_or_else(|| std::io::Error::other("expected version error"))?;

        assert_eq!(error.code, ErrorCode::new("config", "unsupported_version"));
        assert_eq!(error.metadata.get("found").map(String::as_str), Some("2"));
        Ok(())
    }

    #[test]
    fn enum_rule_without_values_is_rejected() -> Result<(), Box<dyn Error>> {
        let payload = serde_json::json!({
            "rules": { "sort": { "kind": "enum", "values": [] } }
        });

        let error = parse_guard_config_json(&payload.to_string())
            .err()
            .ok_or_else(|| std::io::Error::other("expected rule error"))?;

        assert_eq!(error.code, ErrorCode::new("config", "invalid_rule"));
        assert_eq!(error.metadata.get("param").map(String::as_str), Some("sort"));
        assert_eq!(error.metadata.get("kind").map(String::as_str), Some("enum"));
        Ok(())
    }

    #[test]
    fn rule_values_are_deduped_in_order() -> Result<(), Box<dyn Error>> {
        let payload = serde_json::json!({
            "rules": { "fields": { "kind": "multiEnum", "values": ["b", "a", "b", "c", "a"] } }
        });

        let config = parse_guard_config_json(&payload.to_string())?;
        let values = config
            .rules
            .get("fields")
            .and_then(ParamRule::values)
            .map(<[String]>::to_vec);
        assert_eq!(
            values,
            Some(vec!["b".to_string(), "a".to_string(), "c".to_string()])
        );
        Ok(())
    }

    #[test]
    fn rule_keys_are_trimmed() -> Result<(), Box<dyn Error>> {
        let config = parse_guard_config_json(r#"{"rules": {" debug ": {"kind": "boolean"}}}"#)?;
        assert_eq!(config.rules.get("debug"), Some(&ParamRule::Boolean));
        assert!(!config.rules.contains_key(" debug "));

        let error = parse_guard_config_json(
            r#"{"rules": {"debug": {"kind": "boolean"}, "debug ": {"kind": "boolean"}}}"#,
        )
        .err()
        .ok_or_else(|| std::io::Error::other("expected duplicate rule error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "invalid_rule"));
        assert_eq!(error.metadata.get("param").map(String::as_str), Some("debug"));
        Ok(())
    }

    #[test]
    fn variable_names_are_trimmed_and_required() -> Result<(), Box<dyn Error>> {
        let config = parse_guard_config_json(r#"{"variables": {"errorFlag": "  flag  "}}"#)?;
        assert_eq!(config.variables.error_flag, "flag");

        let error = parse_guard_config_json(r#"{"variables": {"errorPayload": "   "}}"#)
            .err()
            .ok_or_else(|| std::io::Error::other("expected variable error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "invalid_variable_name"));
        assert_eq!(
            error.metadata.get("field").map(String::as_str),
            Some("errorPayload")
        );
        Ok(())
    }

    #[test]
    fn colliding_error_variables_are_rejected() {
        let result = parse_guard_config_json(
            r#"{"variables": {"errorFlag": "out", "errorPayload": "out"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_guard_config_json(r#"{"variabels": {}}"#).is_err());
        assert!(parse_guard_config_toml("[variables]\nflag = \"x\"\n").is_err());
    }

    #[test]
    fn toml_rules_parse() -> Result<(), Box<dyn Error>> {
        let input = r#"
version = 1

[rules.debug]
kind = "boolean"

[rules.sort]
kind = "enum"
values = ["asc", "desc"]
"#;
        let config = parse_guard_config_toml(input)?;
        assert_eq!(config.rules.get("debug"), Some(&ParamRule::Boolean));
        assert_eq!(config.rules.get("sort").map(ParamRule::kind), Some("enum"));
        Ok(())
    }
}
