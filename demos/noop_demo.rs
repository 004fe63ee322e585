use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use telemetry_appender::init::activate;
use telemetry_appender::noop::NoopTransport;

#[tokio::main]
async fn main() {
    let transport = Arc::new(NoopTransport::default());
    activate(transport, "00000000-demo-key").expect("activate telemetry");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        match i % 3 {
            0 => info!(iteration = i, "demo trace event"),
            1 => warn!(iteration = i, "demo warning event"),
            _ => error!(iteration = i, "demo error event"),
        }
    }

    let elapsed = start.elapsed();
    println!(
        "noop transport: sent {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Give the background task a little time to drain the channel
    sleep(Duration::from_secs(2)).await;
}
