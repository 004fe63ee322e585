use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use telemetry_appender::env::{
    env_or, TELEMETRY_INGESTION_URL_ENV, TELEMETRY_INSTRUMENTATION_KEY_ENV,
};
use telemetry_appender::http::{HttpTransport, HttpTransportConfig};
use telemetry_appender::init::activate;

#[tokio::main]
async fn main() {
    let transport = Arc::new(HttpTransport::new(HttpTransportConfig {
        endpoint: env_or(TELEMETRY_INGESTION_URL_ENV, "http://127.0.0.1:8080/v2/track"),
        api_key: std::env::var(telemetry_appender::env::TELEMETRY_API_KEY_ENV).ok(),
    }));
    let key = env_or(TELEMETRY_INSTRUMENTATION_KEY_ENV, "local-dev-key");
    activate(transport, &key).expect("activate telemetry");

    info!(service = "http_demo", "service starting");

    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "upstream refused");
    error!(
        error = &io as &(dyn std::error::Error + 'static),
        "failed to reach upstream"
    );

    // Let the channel client flush before exiting
    sleep(Duration::from_secs(2)).await;
}
