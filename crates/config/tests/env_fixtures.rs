//! Integration tests for env parsing and env-to-config merging.

use param_guard_config::{EnvParseError, GuardConfig, GuardEnv, apply_env_overrides};
use param_guard_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative);
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[test]
fn env_fixture_merges_into_effective_config() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("guard-env.valid.json")?;
    let env = GuardEnv::from_map(&env_map)?;

    let mut base = GuardConfig::default();
    base.variables.prefix = "file.".to_string();
    let config = apply_env_overrides(base, &env)?;

    assert_eq!(config.variables.error_flag, "env.error");
    assert_eq!(config.variables.error_payload, "env.errorpayload");
    assert_eq!(config.variables.query_param_namespace, "request.queryparam.");
    assert!(config.variables.prefix.is_empty(), "blank prefix clears");
    Ok(())
}

#[test]
fn invalid_env_fixture_maps_to_envelope() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("guard-env.invalid.json")?;
    let error = GuardEnv::from_map(&env_map)
        .err()
        .ok_or_else(|| std::io::Error::other("expected env error"))?;
    assert!(matches!(error, EnvParseError::EmptyValue { .. }));

    let envelope = ErrorEnvelope::from(error);
    assert_eq!(envelope.code, ErrorCode::new("config", "env_empty_value"));
    assert_eq!(
        envelope.metadata.get("env_var").map(String::as_str),
        Some("PGUARD_QUERY_NAMESPACE")
    );
    Ok(())
}
