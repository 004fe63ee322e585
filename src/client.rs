use crate::error::LogAdapterError;
use crate::record::{ExceptionRecord, TraceRecord};

/// Prefix of the SDK identifier stamped on every envelope. The full
/// identifier appends this crate's package version and is kept in the shape
/// existing ingestion dashboards already key on.
pub const SDK_VERSION_PREFIX: &str = "Log4Net: ";

/// Per-client identity attached once at activation and stamped onto every
/// outgoing envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryContext {
    pub instrumentation_key: String,
    pub sdk_version: String,
}

impl TelemetryContext {
    /// Build a context for the given instrumentation key.
    ///
    /// **Returns**
    /// - `Err(LogAdapterError::MissingInstrumentationKey)` when the key is
    ///   empty. Activation is supposed to fail loudly rather than ship
    ///   unattributable telemetry.
    pub fn new(instrumentation_key: impl Into<String>) -> Result<Self, LogAdapterError> {
        let instrumentation_key = instrumentation_key.into();
        if instrumentation_key.is_empty() {
            return Err(LogAdapterError::MissingInstrumentationKey);
        }
        Ok(Self {
            instrumentation_key,
            sdk_version: format!("{}{}", SDK_VERSION_PREFIX, env!("CARGO_PKG_VERSION")),
        })
    }
}

/// Destination for telemetry records built by the adapter.
///
/// Submission is fire-and-forget: the adapter never blocks on delivery and
/// never sees transport failures. Buffering, batching and retry all live
/// behind this trait, and implementations must be safe to call from
/// whatever threads the logging framework dispatches on.
pub trait TelemetryClient: Send + Sync {
    /// Accept a trace record for delivery.
    fn track_trace(&self, record: TraceRecord);

    /// Accept an exception record for delivery.
    fn track_exception(&self, record: ExceptionRecord);

    /// The context this client stamps onto outgoing envelopes.
    fn context(&self) -> &TelemetryContext;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_empty_key() {
        let err = TelemetryContext::new("").unwrap_err();
        assert!(matches!(err, LogAdapterError::MissingInstrumentationKey));
    }

    #[test]
    fn sdk_version_carries_prefix_and_crate_version() {
        let ctx = TelemetryContext::new("ikey-123").unwrap();
        assert!(ctx.sdk_version.starts_with(SDK_VERSION_PREFIX));
        assert!(ctx.sdk_version.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
