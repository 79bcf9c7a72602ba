//! Validate command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, log_info};
use param_guard_adapters::{
    InMemoryVariableStore, TracingLogger, parse_query_string, parse_url_query,
};
use param_guard_app::{
    ValidateQueryParamsDeps, ValidationSettings, build_validators, get_query_params_in,
    validate_query_params_with,
};
use param_guard_config::{GuardEnv, ValidatedGuardConfig, load_guard_config_from_path};
use param_guard_domain::{QueryParams, ValidationReport, VariableValue};
use param_guard_ports::VariableStorePort;
use param_guard_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Where the request's query parameters come from.
#[derive(Debug, Clone, Copy)]
pub enum QuerySource<'a> {
    /// Raw query string, with or without the leading `?`.
    QueryString(&'a str),
    /// Absolute request URL.
    Url(&'a str),
}

/// Inputs for the validate command.
#[derive(Debug, Clone, Copy)]
pub struct ValidateCommandInput<'a> {
    pub source: QuerySource<'a>,
    pub config: Option<&'a Path>,
    pub overrides_json: Option<&'a str>,
}

/// Run the validate command with `PGUARD_*` overrides from the process env.
pub fn run_validate(
    mode: OutputMode,
    input: ValidateCommandInput<'_>,
) -> Result<CliOutput, CliError> {
    let env = GuardEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    run_validate_with_env(mode, &env, input)
}

pub(crate) fn run_validate_with_env(
    mode: OutputMode,
    env: &GuardEnv,
    input: ValidateCommandInput<'_>,
) -> Result<CliOutput, CliError> {
    let config = load_guard_config_from_path(input.config, input.overrides_json, env)?;
    let params = read_source(input.source)?;

    let outcome = validate_request(&config, &params);

    let mut stderr = String::new();
    log_info(&mut stderr, "validate completed", mode.no_progress);

    let stdout = if mode.is_json() {
        format_outcome_json(&outcome)?
    } else {
        format_outcome_text(&outcome)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: if outcome.report.error {
            ExitCode::InvalidInput
        } else {
            ExitCode::Ok
        },
    })
}

struct ValidateOutcome {
    param_count: usize,
    report: ValidationReport,
    variables: BTreeMap<String, VariableValue>,
}

fn read_source(source: QuerySource<'_>) -> Result<QueryParams, ErrorEnvelope> {
    match source {
        QuerySource::QueryString(query) => Ok(parse_query_string(query)),
        QuerySource::Url(url) => parse_url_query(url),
    }
}

fn validate_request(config: &ValidatedGuardConfig, params: &QueryParams) -> ValidateOutcome {
    let variables = &config.variables;
    let store = InMemoryVariableStore::from_query_params(&variables.query_param_namespace, params);
    let values = get_query_params_in(&store, &variables.query_param_namespace, params.names());

    let settings = ValidationSettings {
        error_flag_var: variables.error_flag.clone(),
        error_payload_var: variables.error_payload.clone(),
        prefix: variables.prefix.clone(),
    };
    let validators = build_validators(&config.rules);
    let deps = ValidateQueryParamsDeps {
        store: &store,
        logger: Some(Arc::new(TracingLogger::new())),
    };
    let report = validate_query_params_with(&deps, &settings, &values, &validators);

    let mut written = BTreeMap::new();
    for name in [&settings.error_flag_var, &settings.error_payload_var] {
        let name = format!("{}{name}", settings.prefix);
        if let Some(value) = store.get_variable(&name) {
            written.insert(name, value);
        }
    }

    ValidateOutcome {
        param_count: values.len(),
        report,
        variables: written,
    }
}

const fn status_label(report: &ValidationReport) -> &'static str {
    if report.error { "invalid" } else { "valid" }
}

fn format_outcome_text(outcome: &ValidateOutcome) -> String {
    let mut out = String::new();
    out.push_str("status: ");
    out.push_str(status_label(&outcome.report));
    out.push('\n');
    out.push_str(&format!("params: {}\n", outcome.param_count));

    let errors = outcome.report.errors();
    out.push_str(&format!("errors: {}\n", errors.len()));
    for record in errors {
        out.push_str(&format!("  - {}: {}\n", record.source, record.message));
    }

    if !outcome.variables.is_empty() {
        out.push_str("variables:\n");
        for (name, value) in &outcome.variables {
            let rendered = match value {
                VariableValue::String(value) => value.clone(),
                VariableValue::Bool(value) => value.to_string(),
                VariableValue::Null => "null".to_string(),
            };
            out.push_str(&format!("  {name}: {rendered}\n"));
        }
    }
    out
}

fn format_outcome_json(outcome: &ValidateOutcome) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": status_label(&outcome.report),
        "params": outcome.param_count,
        "error": outcome.report.error,
        "payload": outcome.report.payload,
        "variables": outcome.variables,
    });
    let mut output = serde_json::to_string_pretty(&payload)?;
    output.push('\n');
    Ok(output)
}
