/// Environment variable names used by this crate for convenient
/// configuration from services.
///
/// These are purely helpers; the core types remain decoupled from
/// environment access. The instrumentation key in particular has no
/// baked-in default and must come from deployment configuration.

/// Telemetry instrumentation key.
pub const TELEMETRY_INSTRUMENTATION_KEY_ENV: &str = "TELEMETRY_INSTRUMENTATION_KEY";

/// Ingestion endpoint URL for the HTTP transport,
/// e.g. `https://ingest.example.com/v2/track`.
pub const TELEMETRY_INGESTION_URL_ENV: &str = "TELEMETRY_INGESTION_URL";

/// Optional API key for the HTTP transport.
pub const TELEMETRY_API_KEY_ENV: &str = "TELEMETRY_API_KEY";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
