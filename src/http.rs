use crate::record::{Envelope, TelemetryRecord};
use crate::transport::TelemetryTransport;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::error::Error;

/// Configuration for [`HttpTransport`].
///
/// The transport posts envelopes to an ingestion endpoint as
/// newline-delimited JSON rows, one row per envelope.
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Full ingestion URL, e.g. "https://ingest.example.com/v2/track".
    pub endpoint: String,
    /// Optional API key sent as the `x-api-key` header.
    pub api_key: Option<String>,
}

/// HTTP implementation of [`TelemetryTransport`].
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Construct a new transport using the provided configuration.
    ///
    /// **Parameters**
    /// - `config`: [`HttpTransportConfig`] describing the target endpoint
    ///   and optional authentication.
    ///
    /// **Returns**
    /// - A ready-to-use [`HttpTransport`] that can be passed into
    ///   [`crate::init::activate`] / [`crate::init::activate_with_config`].
    pub fn new(config: HttpTransportConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    fn map_envelope(&self, envelope: &Envelope) -> IngestionRow {
        let common = envelope.record.common();
        let (kind, message, error_type, error_message, stack_trace) = match &envelope.record {
            TelemetryRecord::Trace(t) => ("trace", Some(t.message.clone()), None, None, None),
            TelemetryRecord::Exception(e) => (
                "exception",
                None,
                e.error.type_name.clone(),
                Some(e.error.message.clone()),
                e.error.stack_trace.clone(),
            ),
        };

        IngestionRow {
            time: common.timestamp.to_rfc3339(),
            ikey: envelope.instrumentation_key.clone(),
            sdk_version: envelope.sdk_version.clone(),
            kind,
            message,
            error_type,
            error_message,
            stack_trace,
            severity: common.severity.map(|s| s.as_str().to_string()),
            user_id: common.user_id.clone(),
            properties: serde_json::to_string(&common.properties)
                .unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

#[async_trait]
impl TelemetryTransport for HttpTransport {
    async fn send(&self, envelopes: &[Envelope]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut body = String::new();
        for envelope in envelopes {
            body.push_str(&serde_json::to_string(&self.map_envelope(envelope))?);
            body.push('\n');
        }

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("content-type", "application/x-ndjson")
            .body(body);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("ingestion endpoint returned {}: {}", status, text).into());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct IngestionRow {
    time: String,
    ikey: String,
    sdk_version: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    properties: String,
}
