//! Config command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, log_info};
use param_guard_config::{ValidatedGuardConfig, load_guard_config_std_env, to_pretty_toml};
use param_guard_shared::ErrorEnvelope;
use std::path::Path;

/// Load, merge, and validate the config; report success only.
pub fn run_config_check(
    mode: OutputMode,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let config = load_from_std_env(path, overrides_json)?;
    format_config_check(mode, path, &config)
}

/// Print the effective config after env and JSON overrides.
pub fn run_config_show(
    mode: OutputMode,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let config = load_from_std_env(path, overrides_json)?;
    format_config_show(mode, path, &config)
}

fn load_from_std_env(
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let config = load_guard_config_std_env(path, overrides_json)?;
    tracing::debug!(rules = config.rules.len(), "effective config loaded");
    Ok(config)
}

fn format_config_check(
    mode: OutputMode,
    path: Option<&Path>,
    config: &ValidatedGuardConfig,
) -> Result<CliOutput, CliError> {
    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.no_progress);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().to_string()),
            "rules": config.rules.len(),
        });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        let mut out = String::from("status: ok\nconfig: ok\n");
        if let Some(path) = path {
            out.push_str(&format!("path: {}\n", path.to_string_lossy()));
        }
        out.push_str(&format!("rules: {}\n", config.rules.len()));
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn format_config_show(
    mode: OutputMode,
    path: Option<&Path>,
    config: &ValidatedGuardConfig,
) -> Result<CliOutput, CliError> {
    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().to_string()),
            "effectiveConfig": config.as_ref(),
        });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        let rendered = to_pretty_toml(config)?;
        let mut out = String::from("status: ok\nconfig:\n");
        out.push_str(&rendered);
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}
