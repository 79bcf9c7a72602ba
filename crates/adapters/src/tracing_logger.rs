//! Logger adapter that forwards events to `tracing`.

use crate::logger::{fields_to_json, merge_fields};
use param_guard_ports::{LogEvent, LogFields, LogLevel, LoggerPort};

/// Forwards `LoggerPort` events to the active `tracing` subscriber.
///
/// The event name is recorded as `event`; structured fields are rendered as a
/// single JSON `fields` value after redaction.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Create a logger with no base fields.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base_fields: LogFields::new(),
        }
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let fields = merge_fields(&self.base_fields, event.fields);
        let fields = if fields.is_empty() {
            String::new()
        } else {
            fields_to_json(&fields).to_string()
        };
        let name = &*event.event;
        let message = &*event.message;

        match event.level {
            LogLevel::Debug => tracing::debug!(event = name, fields = %fields, "{message}"),
            LogLevel::Info => tracing::info!(event = name, fields = %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(event = name, fields = %fields, "{message}"),
            LogLevel::Error => tracing::error!(event = name, fields = %fields, "{message}"),
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            base_fields: merged,
        })
    }
}
