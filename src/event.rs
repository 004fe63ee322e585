use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;

/// Severity level of the inbound logging framework.
///
/// Levels are totally ordered from least to most severe; the ordering is
/// what drives the mapping onto telemetry severity tiers in
/// [`crate::severity::severity_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

/// Source-location metadata attached to an event, when the emitting
/// framework captured it. Individual fields may still be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationInfo {
    pub class_name: Option<String>,
    pub file_name: Option<String>,
    pub method_name: Option<String>,
    pub line_number: Option<u32>,
}

/// An exception/error captured alongside a log event.
///
/// This is the explicit accessor-backed representation of the error object
/// that travels with the event, so the adapter never has to reach into
/// framework internals to get at it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CapturedError {
    pub type_name: Option<String>,
    pub message: String,
    pub stack_trace: Option<String>,
}

impl CapturedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            type_name: None,
            message: message.into(),
            stack_trace: None,
        }
    }

    /// Capture a `std::error::Error`, flattening its `source()` chain into
    /// the stack-trace field (one cause per line).
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut cause = err.source();
        while let Some(c) = cause {
            chain.push(c.to_string());
            cause = c.source();
        }
        Self {
            type_name: None,
            message: err.to_string(),
            stack_trace: if chain.is_empty() {
                None
            } else {
                Some(chain.join("\n"))
            },
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

impl std::fmt::Display for CapturedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.type_name {
            Some(t) => write!(f, "{}: {}", t, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// One rendered logging occurrence, read-only to the adapter.
///
/// Carries everything the telemetry mapping needs: timestamp, level,
/// rendered message, logger/thread identity, optional source location,
/// domain/identity/user metadata, an optional captured error, and the
/// open-ended context-property mapping applications attach to events.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Option<Level>,
    /// Fully rendered message text. `None` when the upstream layout
    /// produced nothing; the trace path substitutes a fallback literal.
    pub message: Option<String>,
    pub logger_name: Option<String>,
    pub thread_name: Option<String>,
    pub location: Option<LocationInfo>,
    pub domain: Option<String>,
    pub identity: Option<String>,
    pub user_name: Option<String>,
    error: Option<CapturedError>,
    /// Pre-rendered textual representation of the attached exception, when
    /// the framework rendered one independently of the error object.
    pub exception_text: Option<String>,
    pub properties: BTreeMap<String, Value>,
}

impl LogEvent {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            level: None,
            message: None,
            logger_name: None,
            thread_name: None,
            location: None,
            domain: None,
            identity: None,
            user_name: None,
            error: None,
            exception_text: None,
            properties: BTreeMap::new(),
        }
    }

    /// Event stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_logger_name(mut self, logger_name: impl Into<String>) -> Self {
        self.logger_name = Some(logger_name.into());
        self
    }

    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    pub fn with_location(mut self, location: LocationInfo) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_error(mut self, error: CapturedError) -> Self {
        self.error = Some(error);
        self
    }

    /// Attach a pre-rendered exception string without an error object.
    /// Handling such an event selects the exception path and then fails,
    /// which is the intended behavior for this malformed shape.
    pub fn with_exception_text(mut self, text: impl Into<String>) -> Self {
        self.exception_text = Some(text.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// The error object captured with this event, if any.
    pub fn captured_error(&self) -> Option<&CapturedError> {
        self.error.as_ref()
    }

    /// Non-empty textual representation of the attached exception, used to
    /// decide between the exception and trace paths. Prefers the
    /// pre-rendered text; falls back to rendering the captured error.
    pub fn exception_repr(&self) -> Option<String> {
        match self.exception_text.as_deref() {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => self
                .error
                .as_ref()
                .map(|e| e.to_string())
                .filter(|repr| !repr.is_empty()),
        }
    }
}
