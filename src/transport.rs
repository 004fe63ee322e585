use crate::record::Envelope;
use async_trait::async_trait;
use std::error::Error;

/// Asynchronous delivery mechanism behind a [`crate::channel::ChannelTelemetryClient`].
///
/// Implementations move envelopes to a concrete ingestion backend (HTTP
/// endpoint, stdout, a test capture). The client calls `send` from its own
/// background task and never awaits it on the application thread.
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    /// Deliver a batch of envelopes to the backend.
    ///
    /// **Parameters**
    /// - `envelopes`: context-stamped records, in arrival order.
    ///
    /// **Returns**
    /// - `Ok(())` if the whole batch was accepted by the backend.
    /// - `Err(..)` on any backend failure (network error, serialization
    ///   error, HTTP status). The client treats this as transient and
    ///   retries the batch with backoff.
    async fn send(&self, envelopes: &[Envelope]) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush any transport-level buffering.
    ///
    /// Default implementation is a no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
