use crate::event::CapturedError;
use crate::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fields shared by every telemetry record variant: event timestamp, the
/// user the event was recorded for, mapped severity (absent when the event
/// level was unset) and the flattened property mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryCommon {
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
    pub severity: Option<Severity>,
    pub properties: BTreeMap<String, String>,
}

/// A rendered log message submitted as a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub message: String,
    #[serde(flatten)]
    pub common: TelemetryCommon,
}

/// A captured error submitted as an exception.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionRecord {
    pub error: CapturedError,
    #[serde(flatten)]
    pub common: TelemetryCommon,
}

/// Either record variant, as it travels through the client internals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryRecord {
    Trace(TraceRecord),
    Exception(ExceptionRecord),
}

impl TelemetryRecord {
    pub fn common(&self) -> &TelemetryCommon {
        match self {
            TelemetryRecord::Trace(t) => &t.common,
            TelemetryRecord::Exception(e) => &e.common,
        }
    }
}

/// A record stamped with the owning client's context, ready for transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub instrumentation_key: String,
    pub sdk_version: String,
    #[serde(flatten)]
    pub record: TelemetryRecord,
}
