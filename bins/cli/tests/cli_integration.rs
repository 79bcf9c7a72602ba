//! CLI integration tests.

use std::path::{Path, PathBuf};
use std::process::Command;

fn run_cli_clean_env(args: &[&str]) -> std::io::Result<std::process::Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pguard"));
    command.args(args);
    scrub_scoped_env(&mut command);
    command.output()
}

fn scrub_scoped_env(command: &mut Command) {
    for (key, _) in std::env::vars() {
        if key.starts_with("PGUARD_") {
            command.env_remove(key);
        }
    }
    command.env_remove("RUST_LOG");
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_arg(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    fixture(name)
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| "fixture path is not UTF-8".into())
}

#[test]
fn validate_clean_query_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture_arg("guard.toml")?;
    let output = run_cli_clean_env(&[
        "validate",
        "--query",
        "?debug=false&fields=id,name&sort=asc",
        "--config",
        &config,
        "--no-progress",
    ])?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("status: valid\n"));
    assert!(stdout.contains("params: 3\n"));
    assert!(stdout.contains("  guard.error: false\n"));
    assert!(stdout.contains("  guard.errorpayload: {}\n"));
    Ok(())
}

#[test]
fn validate_rejections_exit_two_with_json_payload() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture_arg("guard.toml")?;
    let output = run_cli_clean_env(&[
        "--output",
        "json",
        "validate",
        "--query",
        "sort=random&fields=id,+name",
        "--config",
        &config,
    ])?;

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value.get("status"), Some(&serde_json::json!("invalid")));
    assert_eq!(value.pointer("/payload/statusCode"), Some(&serde_json::json!(400)));

    let sources: Vec<&str> = value
        .pointer("/payload/errors")
        .and_then(serde_json::Value::as_array)
        .ok_or("missing errors")?
        .iter()
        .filter_map(|record| record.get("source").and_then(serde_json::Value::as_str))
        .collect();
    assert_eq!(sources, vec!["sort", "fields"]);

    let stored = value
        .pointer("/variables/guard.errorpayload")
        .and_then(serde_json::Value::as_str)
        .ok_or("missing stored payload")?;
    let stored: serde_json::Value = serde_json::from_str(stored)?;
    assert_eq!(stored.get("errors"), value.pointer("/payload/errors"));
    Ok(())
}

#[test]
fn validate_env_prefix_renames_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture_arg("guard.toml")?;
    let mut command = Command::new(env!("CARGO_BIN_EXE_pguard"));
    scrub_scoped_env(&mut command);
    let output = command
        .args(["--json", "validate", "--url", "https://api.example.com/v1?debug=1"])
        .args(["--config", &config])
        .env("PGUARD_PREFIX", "flow.")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        value.pointer("/variables/flow.guard.error"),
        Some(&serde_json::json!(true))
    );
    Ok(())
}

#[test]
fn invalid_url_is_reported_without_query() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli_clean_env(&["validate", "--url", "/relative?api_key=secret"])?;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("code: request:invalid_url\n"));
    assert!(!stdout.contains("secret"));
    Ok(())
}

#[test]
fn missing_query_source_is_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli_clean_env(&["validate"])?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn config_check_rejects_invalid_rules() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture_arg("guard.invalid.toml")?;
    let output = run_cli_clean_env(&["config", "check", "--config", &config, "--output", "json"])?;

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value.get("status"), Some(&serde_json::json!("error")));
    assert!(value.get("error").is_some());
    Ok(())
}

#[test]
fn config_show_defaults_without_file() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli_clean_env(&["config", "show", "--output", "json", "--no-progress"])?;

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        value.pointer("/effectiveConfig/variables/queryParamNamespace"),
        Some(&serde_json::json!("request.queryparam."))
    );
    assert_eq!(
        value.pointer("/effectiveConfig/variables/errorPayload"),
        Some(&serde_json::json!("errorpayload"))
    );
    Ok(())
}

#[test]
fn empty_env_override_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pguard"));
    scrub_scoped_env(&mut command);
    let output = command
        .args(["config", "check"])
        .env("PGUARD_ERROR_FLAG_VAR", "   ")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("code: config:env_empty_value\n"));
    Ok(())
}
