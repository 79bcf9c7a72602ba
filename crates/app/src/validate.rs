//! Query-parameter validation and error aggregation.

use crate::query_params::set_variables;
use param_guard_domain::{ErrorRecord, QueryParams, ValidationReport, Validators, VariableValue};
use param_guard_ports::{LogFields, LoggerPort, VariableStorePort};
use param_guard_shared::redact_if_secret;
use serde_json::Value;
use std::sync::Arc;

/// Variable receiving the boolean error flag.
pub const ERROR_FLAG_VAR: &str = "error";
/// Variable receiving the JSON error payload.
pub const ERROR_PAYLOAD_VAR: &str = "errorpayload";

/// Names and prefix used when persisting a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Variable receiving the boolean error flag.
    pub error_flag_var: String,
    /// Variable receiving the JSON error payload.
    pub error_payload_var: String,
    /// Prefix applied to both variables.
    pub prefix: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            error_flag_var: ERROR_FLAG_VAR.to_string(),
            error_payload_var: ERROR_PAYLOAD_VAR.to_string(),
            prefix: String::new(),
        }
    }
}

/// Dependencies for [`validate_query_params_with`].
#[derive(Clone)]
pub struct ValidateQueryParamsDeps<'a> {
    /// Request-scoped host context.
    pub store: &'a dyn VariableStorePort,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Run every registered validator and aggregate the rejections.
///
/// Parameters are visited in `values` order. Absent values and parameters
/// without a validator are skipped. Rejections of one parameter keep the
/// order the validator reported them in.
pub fn build_validation_report(values: &QueryParams, validators: &Validators) -> ValidationReport {
    ValidationReport::from_errors(collect_errors(values, validators, |_, _| {}))
}

/// Validate, persist `error`/`errorpayload` without prefix, and return the flag.
pub fn validate_query_params(
    store: &dyn VariableStorePort,
    values: &QueryParams,
    validators: &Validators,
) -> bool {
    let deps = ValidateQueryParamsDeps {
        store,
        logger: None,
    };
    validate_query_params_with(&deps, &ValidationSettings::default(), values, validators).error
}

/// Validate, persist the report under the configured names, and log the outcome.
#[tracing::instrument(level = "debug", skip_all, fields(params = values.len()))]
pub fn validate_query_params_with(
    deps: &ValidateQueryParamsDeps<'_>,
    settings: &ValidationSettings,
    values: &QueryParams,
    validators: &Validators,
) -> ValidationReport {
    let logger = deps.logger.as_deref();
    let errors = collect_errors(values, validators, |record, value| {
        if let Some(logger) = logger {
            logger.debug(
                "validation.rejected",
                "Query parameter rejected",
                Some(log_fields_rejected(record, value)),
            );
        }
    });
    let report = ValidationReport::from_errors(errors);

    persist_report(deps.store, settings, &report);

    if let Some(logger) = logger {
        logger.info(
            "validation.completed",
            "Query parameters validated",
            Some(log_fields_completed(values, &report)),
        );
    }

    report
}

fn collect_errors(
    values: &QueryParams,
    validators: &Validators,
    mut on_reject: impl FnMut(&ErrorRecord, &str),
) -> Vec<ErrorRecord> {
    let mut errors = Vec::new();
    for (key, value) in values.iter() {
        let Some(value) = value else {
            continue;
        };
        let Some(validator) = validators.get(key) else {
            continue;
        };

        for message in validator.validate(value).into_rejections() {
            let record = ErrorRecord::new(key, value, message.as_deref());
            on_reject(&record, value);
            errors.push(record);
        }
    }
    errors
}

fn persist_report(
    store: &dyn VariableStorePort,
    settings: &ValidationSettings,
    report: &ValidationReport,
) {
    // Only strings and integers inside; serialization does not fail.
    let payload = serde_json::to_string(&report.payload).unwrap_or_else(|_| String::from("{}"));

    set_variables(
        store,
        [
            (
                settings.error_flag_var.as_str(),
                Some(VariableValue::Bool(report.error)),
            ),
            (
                settings.error_payload_var.as_str(),
                Some(VariableValue::String(payload)),
            ),
        ],
        &settings.prefix,
    );
}

fn log_fields_rejected(record: &ErrorRecord, value: &str) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "param".to_owned().into_boxed_str(),
        Value::String(record.source.clone()),
    );
    fields.insert(
        "value".to_owned().into_boxed_str(),
        Value::String(redact_if_secret(&record.source, value)),
    );
    fields.insert(
        "message".to_owned().into_boxed_str(),
        Value::String(redact_if_secret(&record.source, &record.message)),
    );
    fields
}

fn log_fields_completed(values: &QueryParams, report: &ValidationReport) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "paramCount".to_owned().into_boxed_str(),
        Value::from(values.len()),
    );
    fields.insert(
        "errorCount".to_owned().into_boxed_str(),
        Value::from(report.errors().len()),
    );
    fields.insert("error".to_owned().into_boxed_str(), Value::Bool(report.error));
    fields
}
