use crate::record::Envelope;
use crate::transport::TelemetryTransport;
use async_trait::async_trait;
use std::error::Error;

/// A transport that drops every envelope.
///
/// Useful for measuring the overhead of the adapter and client without any
/// external I/O, and for unit tests that don't care about delivery.
#[derive(Clone, Default)]
pub struct NoopTransport;

#[async_trait]
impl TelemetryTransport for NoopTransport {
    async fn send(&self, _envelopes: &[Envelope]) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
