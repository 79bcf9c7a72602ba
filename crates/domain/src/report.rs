//! Aggregated validation errors and the client-facing payload.

use serde::{Deserialize, Serialize};

/// Title of a populated error payload.
pub const PAYLOAD_TITLE: &str = "Invalid query parameter";
/// Message of a populated error payload.
pub const PAYLOAD_MESSAGE: &str = "One or more query parameters are invalid";
/// HTTP status reported in a populated error payload.
pub const PAYLOAD_STATUS_CODE: u16 = 400;

/// One failed validation rule for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// `Invalid <key> query parameter`.
    pub title: String,
    /// Custom validator message or the default message.
    pub message: String,
    /// Parameter name.
    pub source: String,
}

impl ErrorRecord {
    /// Build a record for `key`. A missing or empty message uses
    /// [`default_message`].
    #[must_use]
    pub fn new(key: &str, value: &str, message: Option<&str>) -> Self {
        let message = match message {
            Some(message) if !message.is_empty() => message.to_owned(),
            _ => default_message(key, value),
        };
        Self {
            title: format!("Invalid {key} query parameter"),
            message,
            source: key.to_owned(),
        }
    }
}

/// Default rejection message for a parameter value.
#[must_use]
pub fn default_message(key: &str, value: &str) -> String {
    format!("Invalid {key} parameter. You passed \"{value}\".")
}

/// Populated error payload body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidPayload {
    /// Always [`PAYLOAD_TITLE`].
    pub title: String,
    /// Always [`PAYLOAD_MESSAGE`].
    pub message: String,
    /// Always [`PAYLOAD_STATUS_CODE`].
    pub status_code: u16,
    /// Error records in parameter order.
    pub errors: Vec<ErrorRecord>,
}

/// Body of an empty payload. Only `{}` decodes into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyPayload {}

/// Error payload written to the context; serializes to `{}` when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    /// At least one parameter failed.
    Invalid(InvalidPayload),
    /// No errors.
    Empty(EmptyPayload),
}

impl ErrorPayload {
    /// Error records (empty for [`ErrorPayload::Empty`]).
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        match self {
            Self::Invalid(payload) => payload.errors.as_slice(),
            Self::Empty(_) => &[],
        }
    }

    /// Status code when populated.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Invalid(payload) => Some(payload.status_code),
            Self::Empty(_) => None,
        }
    }
}

/// Outcome of validating one set of query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when at least one error record was produced.
    pub error: bool,
    /// Payload for the downstream response policy.
    pub payload: ErrorPayload,
}

impl ValidationReport {
    /// Build a report from accumulated records.
    #[must_use]
    pub fn from_errors(errors: Vec<ErrorRecord>) -> Self {
        if errors.is_empty() {
            return Self {
                error: false,
                payload: ErrorPayload::Empty(EmptyPayload {}),
            };
        }

        Self {
            error: true,
            payload: ErrorPayload::Invalid(InvalidPayload {
                title: PAYLOAD_TITLE.to_owned(),
                message: PAYLOAD_MESSAGE.to_owned(),
                status_code: PAYLOAD_STATUS_CODE,
                errors,
            }),
        }
    }

    /// Error records in emission order.
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        self.payload.errors()
    }
}
