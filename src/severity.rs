use crate::event::Level;
use serde::Serialize;

/// Severity tier of the telemetry schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Verbose,
    Information,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Verbose => "Verbose",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        }
    }
}

/// Map a framework level onto a telemetry severity tier.
///
/// The mapping is a step function over the level ordering with strict
/// less-than thresholds, so a level exactly at a threshold lands in the
/// higher tier (`Info` maps to `Information`, `Fatal` to `Critical`).
/// An unset level stays unset.
pub fn severity_of(level: Option<Level>) -> Option<Severity> {
    let level = level?;
    Some(if level < Level::Info {
        Severity::Verbose
    } else if level < Level::Warn {
        Severity::Information
    } else if level < Level::Error {
        Severity::Warning
    } else if level < Level::Fatal {
        Severity::Error
    } else {
        Severity::Critical
    })
}
