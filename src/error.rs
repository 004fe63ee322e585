use thiserror::Error;

/// Faults surfaced by this crate's public API.
#[derive(Debug, Error)]
pub enum LogAdapterError {
    /// Activation was attempted without an instrumentation key. The key
    /// must come from configuration; there is no baked-in default.
    #[error("instrumentation key must not be empty")]
    MissingInstrumentationKey,

    /// A telemetry record could not be built from the event. This is the
    /// single wrapper the adapter re-raises build faults under; the
    /// underlying cause stays attached as the error source.
    #[error("failed to build telemetry record: {message}")]
    Record {
        message: String,
        #[source]
        source: RecordBuildError,
    },

    /// The global tracing subscriber was already installed.
    #[error("global subscriber already set")]
    SubscriberInstall(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Faults encountered while assembling a record from a log event.
#[derive(Debug, Error)]
pub enum RecordBuildError {
    /// The event selected the exception path (it carries a non-empty
    /// exception representation) but exposes no captured error object.
    /// Substituting a placeholder would hide a broken producer, so this is
    /// an error rather than a silent downgrade to a trace.
    #[error("event has an exception representation but no captured error (logger: {logger})")]
    MissingCapturedError { logger: String },
}
