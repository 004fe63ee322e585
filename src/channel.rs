use crate::client::{TelemetryClient, TelemetryContext};
use crate::record::{Envelope, ExceptionRecord, TelemetryRecord, TraceRecord};
use crate::transport::TelemetryTransport;
use std::error::Error;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Channel-backed [`TelemetryClient`] that decouples record submission
/// from delivery.
///
/// `track_*` stamps the record with the client context and pushes it into
/// a bounded channel; a background task batches envelopes and hands them
/// to a [`TelemetryTransport`]. Submission never blocks and never fails —
/// when the channel is full the record is dropped and counted instead of
/// stalling the logging thread.
pub struct ChannelTelemetryClient {
    sender: mpsc::Sender<Envelope>,
    context: TelemetryContext,
    /// Records handed to `track_trace`/`track_exception`.
    pub submitted_records: Arc<AtomicU64>,
    /// Successfully enqueued into the channel.
    pub enqueued_records: Arc<AtomicU64>,
    /// Dropped because the channel was full.
    pub dropped_records: Arc<AtomicU64>,
}

impl ChannelTelemetryClient {
    /// Create a client and spawn the background delivery task.
    ///
    /// Minimal thresholds are enforced for `buffer`, `batch_size` and
    /// `flush_interval` to avoid degenerate configurations.
    pub fn new(
        transport: Arc<dyn TelemetryTransport>,
        context: TelemetryContext,
        buffer: usize,
        batch_size: usize,
        flush_interval: Duration,
    ) -> (Self, JoinHandle<()>) {
        let buffer = buffer.max(16);
        let batch_size = batch_size.max(1);
        let flush_interval = if flush_interval < Duration::from_millis(10) {
            Duration::from_millis(10)
        } else {
            flush_interval
        };

        let (tx, mut rx) = mpsc::channel::<Envelope>(buffer);

        let submitted_records = Arc::new(AtomicU64::new(0));
        let enqueued_records = Arc::new(AtomicU64::new(0));
        let dropped_records = Arc::new(AtomicU64::new(0));

        let enqueued_records_bg = Arc::clone(&enqueued_records);

        let handle = tokio::spawn(async move {
            let mut batch = Vec::with_capacity(batch_size);
            let backoff = Duration::from_millis(100);
            let max_backoff = Duration::from_secs(10);

            loop {
                tokio::select! {
                    Some(envelope) = rx.recv() => {
                        batch.push(envelope);
                        enqueued_records_bg.fetch_add(1, Ordering::Relaxed);
                        if batch.len() >= batch_size {
                            if let Err(e) = send_batch(&*transport, &mut batch, backoff, max_backoff).await {
                                eprintln!("error sending telemetry batch: {}", e);
                            }
                        }
                    }
                    _ = sleep(flush_interval) => {
                        if !batch.is_empty() {
                            if let Err(e) = send_batch(&*transport, &mut batch, backoff, max_backoff).await {
                                eprintln!("error flushing telemetry batch: {}", e);
                            }
                        }
                    }
                }
            }
        });

        (
            Self {
                sender: tx,
                context,
                submitted_records,
                enqueued_records,
                dropped_records,
            },
            handle,
        )
    }

    fn submit(&self, record: TelemetryRecord) {
        self.submitted_records.fetch_add(1, Ordering::Relaxed);
        let envelope = Envelope {
            instrumentation_key: self.context.instrumentation_key.clone(),
            sdk_version: self.context.sdk_version.clone(),
            record,
        };
        if self.sender.try_send(envelope).is_err() {
            self.dropped_records.fetch_add(1, Ordering::Relaxed);
            eprintln!("telemetry channel full, dropping record");
        }
    }
}

impl TelemetryClient for ChannelTelemetryClient {
    fn track_trace(&self, record: TraceRecord) {
        self.submit(TelemetryRecord::Trace(record));
    }

    fn track_exception(&self, record: ExceptionRecord) {
        self.submit(TelemetryRecord::Exception(record));
    }

    fn context(&self) -> &TelemetryContext {
        &self.context
    }
}

async fn send_batch(
    transport: &dyn TelemetryTransport,
    batch: &mut Vec<Envelope>,
    mut backoff: Duration,
    max_backoff: Duration,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        match transport.send(batch).await {
            Ok(()) => {
                batch.clear();
                return Ok(());
            }
            Err(e) => {
                eprintln!("telemetry transport send failed, retrying in {:?}: {}", backoff, e);
                sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, max_backoff);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TelemetryCommon;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct CaptureTransport {
        sent: Mutex<Vec<Envelope>>,
    }

    #[async_trait]
    impl TelemetryTransport for CaptureTransport {
        async fn send(&self, envelopes: &[Envelope]) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.sent.lock().unwrap().extend_from_slice(envelopes);
            Ok(())
        }
    }

    fn trace_record(message: &str) -> TraceRecord {
        TraceRecord {
            message: message.to_string(),
            common: TelemetryCommon {
                timestamp: Utc::now(),
                user_id: None,
                severity: None,
                properties: BTreeMap::new(),
            },
        }
    }

    #[tokio::test]
    async fn delivers_tracked_records_to_the_transport() {
        let transport = Arc::new(CaptureTransport {
            sent: Mutex::new(Vec::new()),
        });
        let context = TelemetryContext::new("channel-ikey").unwrap();
        let (client, _handle) = ChannelTelemetryClient::new(
            transport.clone(),
            context,
            16,
            1,
            Duration::from_millis(10),
        );

        client.track_trace(trace_record("hello"));
        sleep(Duration::from_millis(200)).await;

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].instrumentation_key, "channel-ikey");
        assert!(sent[0].sdk_version.starts_with(crate::client::SDK_VERSION_PREFIX));
        match &sent[0].record {
            TelemetryRecord::Trace(t) => assert_eq!(t.message, "hello"),
            other => panic!("unexpected record: {other:?}"),
        }
        assert_eq!(client.submitted_records.load(Ordering::Relaxed), 1);
        assert_eq!(client.enqueued_records.load(Ordering::Relaxed), 1);
        assert_eq!(client.dropped_records.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn flush_interval_drains_partial_batches() {
        let transport = Arc::new(CaptureTransport {
            sent: Mutex::new(Vec::new()),
        });
        let context = TelemetryContext::new("channel-ikey").unwrap();
        // Batch size larger than what we submit, so only the interval
        // flush can deliver.
        let (client, _handle) = ChannelTelemetryClient::new(
            transport.clone(),
            context,
            16,
            64,
            Duration::from_millis(10),
        );

        client.track_trace(trace_record("partial"));
        sleep(Duration::from_millis(300)).await;

        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }
}
