use crate::client::TelemetryClient;
use crate::error::{LogAdapterError, RecordBuildError};
use crate::event::LogEvent;
use crate::record::{ExceptionRecord, TelemetryCommon, TraceRecord};
use crate::severity::severity_of;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Message substituted when an event reaches the trace path with no
/// rendered message at all. Byte-exact for compatibility with dashboards
/// that already filter on it.
pub const TRACE_MESSAGE_FALLBACK: &str = "Log4Net Trace";

/// Context-property keys starting with this prefix (case-insensitive) are
/// framework bookkeeping and never forwarded.
const RESERVED_PROPERTY_PREFIX: &str = "log4net";

// Label keys for the metadata copied out of the event. The trailing ": "
// is part of the key on the wire; existing dashboards key on it.
const LOGGER_NAME_KEY: &str = "LoggerName: ";
const THREAD_NAME_KEY: &str = "ThreadName: ";
const CLASS_NAME_KEY: &str = "ClassName: ";
const FILE_NAME_KEY: &str = "FileName: ";
const METHOD_NAME_KEY: &str = "MethodName: ";
const LINE_NUMBER_KEY: &str = "LineNumber: ";
const DOMAIN_KEY: &str = "Domain: ";
const IDENTITY_KEY: &str = "Identity: ";

/// Forwards log events into a [`TelemetryClient`].
///
/// One call per event, two paths: an event carrying a non-empty exception
/// representation becomes an [`ExceptionRecord`], anything else becomes a
/// [`TraceRecord`]. The adapter holds no per-call state, so `handle` is
/// safe to invoke concurrently from however many threads the logging
/// framework dispatches on; the shared client handle brings its own
/// synchronization.
pub struct LogEventTelemetryAdapter {
    client: Arc<dyn TelemetryClient>,
}

impl LogEventTelemetryAdapter {
    /// Build an adapter around an already-activated client handle.
    pub fn new(client: Arc<dyn TelemetryClient>) -> Self {
        Self { client }
    }

    /// Translate one event and submit it.
    ///
    /// **Parameters**
    /// - `event`: a fully rendered [`LogEvent`]; read-only to the adapter.
    ///
    /// **Returns**
    /// - `Ok(())` once the record was handed to the client. Delivery is
    ///   fire-and-forget from here on.
    /// - `Err(LogAdapterError::Record { .. })` when the record could not
    ///   be built, with the build fault attached as the source.
    pub fn handle(&self, event: &LogEvent) -> Result<(), LogAdapterError> {
        let outcome = match event.exception_repr() {
            Some(_) => self.send_exception(event),
            None => self.send_trace(event),
        };
        outcome.map_err(|source| LogAdapterError::Record {
            message: source.to_string(),
            source,
        })
    }

    fn send_exception(&self, event: &LogEvent) -> Result<(), RecordBuildError> {
        let error = event.captured_error().cloned().ok_or_else(|| {
            RecordBuildError::MissingCapturedError {
                logger: event.logger_name.clone().unwrap_or_default(),
            }
        })?;
        self.client.track_exception(ExceptionRecord {
            error,
            common: common_fields(event),
        });
        Ok(())
    }

    fn send_trace(&self, event: &LogEvent) -> Result<(), RecordBuildError> {
        let message = event
            .message
            .clone()
            .unwrap_or_else(|| TRACE_MESSAGE_FALLBACK.to_string());
        self.client.track_trace(TraceRecord {
            message,
            common: common_fields(event),
        });
        Ok(())
    }
}

/// Copy the event metadata shared by both record variants.
///
/// Labelled fields are inserted only when present on the event; context
/// properties are copied verbatim except for empty keys, null values and
/// keys under the reserved framework prefix.
fn common_fields(event: &LogEvent) -> TelemetryCommon {
    let mut properties = BTreeMap::new();

    insert_labelled(&mut properties, LOGGER_NAME_KEY, event.logger_name.as_deref());
    insert_labelled(&mut properties, THREAD_NAME_KEY, event.thread_name.as_deref());

    if let Some(location) = &event.location {
        insert_labelled(&mut properties, CLASS_NAME_KEY, location.class_name.as_deref());
        insert_labelled(&mut properties, FILE_NAME_KEY, location.file_name.as_deref());
        insert_labelled(&mut properties, METHOD_NAME_KEY, location.method_name.as_deref());
        let line = location.line_number.map(|l| l.to_string());
        insert_labelled(&mut properties, LINE_NUMBER_KEY, line.as_deref());
    }

    insert_labelled(&mut properties, DOMAIN_KEY, event.domain.as_deref());
    insert_labelled(&mut properties, IDENTITY_KEY, event.identity.as_deref());

    for (key, value) in &event.properties {
        if key.is_empty() {
            continue;
        }
        if key
            .to_ascii_lowercase()
            .starts_with(RESERVED_PROPERTY_PREFIX)
        {
            continue;
        }
        if let Some(text) = render_property_value(value) {
            properties.insert(key.clone(), text);
        }
    }

    TelemetryCommon {
        timestamp: event.timestamp,
        user_id: event.user_name.clone(),
        severity: severity_of(event.level),
        properties,
    }
}

fn insert_labelled(properties: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        properties.insert(key.to_string(), value.to_string());
    }
}

/// Text form of a context-property value. Strings keep their content
/// without JSON quoting; nulls are skipped rather than inserted empty.
fn render_property_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
