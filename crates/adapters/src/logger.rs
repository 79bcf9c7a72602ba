//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use param_guard_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use param_guard_shared::{REDACTED, is_secret_key};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// JSON logger emitting one line per event.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        let fields = merge_fields(&self.base_fields, event.fields);

        let mut payload = serde_json::Map::new();
        payload.insert("timestampMs".to_string(), Value::from(now_epoch_ms()));
        payload.insert(
            "level".to_string(),
            Value::String(event.level.as_str().to_string()),
        );
        payload.insert("event".to_string(), Value::String(event.event.into_string()));
        payload.insert(
            "message".to_string(),
            Value::String(event.message.into_string()),
        );
        if !fields.is_empty() {
            payload.insert("fields".to_string(), fields_to_json(&fields));
        }

        let line = serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        );
        self.sink.write_line(&line);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            sink: Arc::clone(&self.sink),
            base_fields: merged,
            min_level: self.min_level,
        })
    }
}

/// Merge base and event fields (event wins) and redact secret-looking keys.
pub(crate) fn merge_fields(base: &LogFields, extra: Option<LogFields>) -> LogFields {
    let mut fields = base.clone();
    if let Some(extra) = extra {
        fields.extend(extra);
    }
    redact_fields(&mut fields);
    fields
}

pub(crate) fn fields_to_json(fields: &LogFields) -> Value {
    let map = fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    Value::Object(map)
}

fn redact_fields(fields: &mut LogFields) {
    for (key, value) in fields.iter_mut() {
        if is_secret_key(key) {
            *value = Value::String(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }

    // Rejection events name the parameter in `param` and carry its raw `value`.
    let secret_param = fields
        .get("param")
        .and_then(Value::as_str)
        .is_some_and(is_secret_key);
    if secret_param && let Some(value) = fields.get_mut("value") {
        *value = Value::String(REDACTED.to_string());
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if is_secret_key(key) {
                    *nested = Value::String(REDACTED.to_string());
                } else {
                    redact_value(nested);
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                redact_value(item);
            }
        },
        _ => {},
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::MemoryLogSink;
    use serde_json::json;

    fn field(key: &str, value: Value) -> (Box<str>, Value) {
        (key.to_owned().into_boxed_str(), value)
    }

    #[test]
    fn json_logger_redacts_sensitive_fields() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemoryLogSink::new());
        let logger = JsonLogger::new(sink.clone()).with_min_level(LogLevel::Debug);

        let fields = LogFields::from([
            field("api_key", json!("secret")),
            field("param", json!("sort")),
            field(
                "values",
                json!({ "access_token": "should-hide", "sort": "asc" }),
            ),
        ]);

        logger.log(LogEvent {
            event: "validation.rejected".into(),
            level: LogLevel::Info,
            message: "rejected".into(),
            fields: Some(fields),
        });

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        let line = lines.first().ok_or("missing line")?;
        let payload: Value = serde_json::from_str(line.trim())?;
        assert_eq!(payload.get("level"), Some(&json!("info")));
        assert_eq!(payload.get("event"), Some(&json!("validation.rejected")));

        let fields = payload
            .get("fields")
            .and_then(Value::as_object)
            .ok_or("missing fields")?;
        assert_eq!(fields.get("api_key"), Some(&json!(REDACTED)));
        assert_eq!(fields.get("param"), Some(&json!("sort")));
        assert_eq!(
            fields.get("values"),
            Some(&json!({ "access_token": REDACTED, "sort": "asc" }))
        );
        Ok(())
    }

    #[test]
    fn secret_param_values_are_redacted() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemoryLogSink::new());
        let logger = JsonLogger::new(sink.clone());

        let fields = LogFields::from([
            field("param", json!("access_token")),
            field("value", json!("tok-123")),
        ]);
        logger.info("validation.rejected", "rejected", Some(fields));

        let lines = sink.take();
        let line = lines.first().ok_or("missing line")?;
        let payload: Value = serde_json::from_str(line.trim())?;
        assert_eq!(payload.pointer("/fields/param"), Some(&json!("access_token")));
        assert_eq!(payload.pointer("/fields/value"), Some(&json!(REDACTED)));
        Ok(())
    }

    #[test]
    fn events_below_min_level_are_dropped() {
        let sink = Arc::new(MemoryLogSink::new());
        let logger = JsonLogger::new(sink.clone());

        logger.debug("validation.rejected", "dropped", None);
        logger.warn("config.fallback", "kept", None);

        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn child_logger_merges_fields() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemoryLogSink::new());
        let logger = JsonLogger::new(sink.clone())
            .with_base_fields(LogFields::from([field("component", json!("guard"))]));

        let child = logger.child(LogFields::from([field("requestId", json!("req_123"))]));
        child.info("validation.completed", "done", None);

        let lines = sink.take();
        let line = lines.first().ok_or("missing line")?;
        let payload: Value = serde_json::from_str(line.trim())?;
        let fields = payload
            .get("fields")
            .and_then(Value::as_object)
            .ok_or("missing fields")?;
        assert_eq!(fields.get("component"), Some(&json!("guard")));
        assert_eq!(fields.get("requestId"), Some(&json!("req_123")));
        Ok(())
    }
}
