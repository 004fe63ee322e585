use crate::adapter::LogEventTelemetryAdapter;
use crate::channel::ChannelTelemetryClient;
use crate::client::TelemetryContext;
use crate::error::LogAdapterError;
use crate::layer::TelemetryLayer;
use crate::transport::TelemetryTransport;
use std::sync::Arc;
use tokio::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Activation-time configuration of the telemetry pipeline.
///
/// **Fields**
/// - `channel_buffer`: maximum number of envelopes queued in the client
///   before new records are dropped.
/// - `batch_size`: batch size for delivery to the transport.
/// - `flush_interval`: maximum interval between flushes even with a
///   partial batch.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   stacked on top so events also reach the console.
/// - `max_verbosity`: severity floor for forwarding; events more verbose
///   than this are not sent to telemetry.
#[derive(Clone, Debug)]
pub struct AdapterConfig {
    pub channel_buffer: usize,
    pub batch_size: usize,
    pub flush_interval: Duration,
    pub enable_stdout: bool,
    pub max_verbosity: tracing::Level,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 1024,
            batch_size: 128,
            flush_interval: Duration::from_secs(1),
            enable_stdout: true,
            max_verbosity: tracing::Level::TRACE,
        }
    }
}

/// Activate telemetry forwarding for the whole process.
///
/// Builds the client context (validating the instrumentation key), spawns
/// the channel-backed client over `transport`, wraps it in an adapter and
/// installs the resulting layer as the global `tracing` subscriber. Must
/// run exactly once, before the first event; any construction fault
/// propagates to the caller so startup fails loudly.
///
/// **Parameters**
/// - `transport`: delivery mechanism for telemetry envelopes.
/// - `instrumentation_key`: ingestion key, sourced from configuration —
///   see [`crate::env`].
/// - `config`: [`AdapterConfig`] controlling buffering, batching and
///   console output.
pub fn activate_with_config(
    transport: Arc<dyn TelemetryTransport>,
    instrumentation_key: &str,
    config: AdapterConfig,
) -> Result<(), LogAdapterError> {
    let context = TelemetryContext::new(instrumentation_key)?;
    let (client, _handle) = ChannelTelemetryClient::new(
        transport,
        context,
        config.channel_buffer,
        config.batch_size,
        config.flush_interval,
    );
    let adapter = LogEventTelemetryAdapter::new(Arc::new(client));
    let layer = TelemetryLayer::new(adapter).with_max_verbosity(config.max_verbosity);

    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Activate telemetry forwarding with default settings.
///
/// Equivalent to calling [`activate_with_config`] with
/// [`AdapterConfig::default`]. This is the recommended entrypoint for
/// typical services.
pub fn activate(
    transport: Arc<dyn TelemetryTransport>,
    instrumentation_key: &str,
) -> Result<(), LogAdapterError> {
    activate_with_config(transport, instrumentation_key, AdapterConfig::default())
}
