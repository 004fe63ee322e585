use crate::adapter::LogEventTelemetryAdapter;
use crate::event::{CapturedError, Level, LocationInfo, LogEvent};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that converts events into [`LogEvent`]s and
/// feeds them through a [`LogEventTelemetryAdapter`].
///
/// By default every event is forwarded; [`with_max_verbosity`] narrows the
/// layer to a severity floor (e.g. `tracing::Level::ERROR` for errors
/// only). Failures from the adapter are reported on stderr and the event
/// is skipped, which matches the logging framework's log-and-continue
/// error policy.
///
/// [`with_max_verbosity`]: TelemetryLayer::with_max_verbosity
pub struct TelemetryLayer {
    adapter: LogEventTelemetryAdapter,
    max_verbosity: tracing::Level,
}

impl TelemetryLayer {
    pub fn new(adapter: LogEventTelemetryAdapter) -> Self {
        Self {
            adapter,
            max_verbosity: tracing::Level::TRACE,
        }
    }

    /// Only forward events at `level` or more severe.
    pub fn with_max_verbosity(mut self, level: tracing::Level) -> Self {
        self.max_verbosity = level;
        self
    }
}

impl<S> Layer<S> for TelemetryLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        if *event.metadata().level() > self.max_verbosity {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;
        let mut error: Option<CapturedError> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
            error: &mut error,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let mut log_event = LogEvent::new(Utc::now());
        log_event.level = Some(map_level(meta.level()));
        log_event.message = message;
        log_event.logger_name = Some(meta.target().to_string());
        log_event.thread_name = std::thread::current().name().map(|s| s.to_string());
        if meta.module_path().is_some() || meta.file().is_some() || meta.line().is_some() {
            log_event.location = Some(LocationInfo {
                class_name: meta.module_path().map(|s| s.to_string()),
                file_name: meta.file().map(|s| s.to_string()),
                method_name: None,
                line_number: meta.line(),
            });
        }
        log_event.properties = fields;
        if let Some(error) = error {
            log_event = log_event.with_error(error);
        }

        if let Err(e) = self.adapter.handle(&log_event) {
            eprintln!("failed to forward event to telemetry: {}", e);
        }
    }
}

fn map_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        tracing::Level::DEBUG => Level::Debug,
        tracing::Level::TRACE => Level::Trace,
    }
}

use tracing::field::{Field, Visit};

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, Value>,
    pub message: &'a mut Option<String>,
    pub error: &'a mut Option<CapturedError>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn std::error::Error + 'static)) {
        *self.error = Some(CapturedError::from_error(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{TelemetryClient, TelemetryContext};
    use crate::record::{ExceptionRecord, TraceRecord};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    struct CaptureClient {
        context: TelemetryContext,
        traces: Mutex<Vec<TraceRecord>>,
        exceptions: Mutex<Vec<ExceptionRecord>>,
    }

    impl TelemetryClient for CaptureClient {
        fn track_trace(&self, record: TraceRecord) {
            self.traces.lock().unwrap().push(record);
        }

        fn track_exception(&self, record: ExceptionRecord) {
            self.exceptions.lock().unwrap().push(record);
        }

        fn context(&self) -> &TelemetryContext {
            &self.context
        }
    }

    fn capture_layer() -> (TelemetryLayer, Arc<CaptureClient>) {
        let client = Arc::new(CaptureClient {
            context: TelemetryContext::new("layer-ikey").unwrap(),
            traces: Mutex::new(Vec::new()),
            exceptions: Mutex::new(Vec::new()),
        });
        let layer = TelemetryLayer::new(LogEventTelemetryAdapter::new(client.clone()));
        (layer, client)
    }

    #[test]
    fn info_event_becomes_a_trace_with_fields_as_properties() {
        let (layer, client) = capture_layer();
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app::orders", order_id = 991, "order accepted");
        });

        let traces = client.traces.lock().unwrap();
        assert_eq!(traces.len(), 1);
        assert!(client.exceptions.lock().unwrap().is_empty());
        assert_eq!(traces[0].message, "order accepted");
        assert_eq!(
            traces[0].common.severity,
            Some(crate::severity::Severity::Information)
        );
        assert_eq!(
            traces[0].common.properties.get("LoggerName: ").map(String::as_str),
            Some("app::orders")
        );
        assert_eq!(
            traces[0].common.properties.get("order_id").map(String::as_str),
            Some("991")
        );
    }

    #[test]
    fn error_field_routes_down_the_exception_path() {
        let (layer, client) = capture_layer();
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
            tracing::error!(error = &io as &(dyn std::error::Error + 'static), "write failed");
        });

        let exceptions = client.exceptions.lock().unwrap();
        assert_eq!(exceptions.len(), 1);
        assert!(client.traces.lock().unwrap().is_empty());
        assert_eq!(exceptions[0].error.message, "disk gone");
        assert_eq!(
            exceptions[0].common.severity,
            Some(crate::severity::Severity::Error)
        );
    }

    #[test]
    fn events_below_the_verbosity_floor_are_ignored() {
        let (layer, client) = capture_layer();
        let layer = layer.with_max_verbosity(tracing::Level::ERROR);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not forwarded");
            tracing::error!("forwarded");
        });

        let traces = client.traces.lock().unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].message, "forwarded");
    }

    #[test]
    fn location_metadata_is_copied_into_labelled_properties() {
        let (layer, client) = capture_layer();
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("near miss");
        });

        let traces = client.traces.lock().unwrap();
        let props = &traces[0].common.properties;
        // Macro call sites always carry file/line metadata.
        assert!(props.contains_key("FileName: "));
        assert!(props.contains_key("LineNumber: "));
    }
}
