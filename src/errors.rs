use thiserror::Error;

/// Errors raised around the audit engine. The heuristics themselves never
/// fail; these cover the surfaces that feed them.
#[derive(Debug, Error)]
pub enum HudError {
    #[error("invalid color token: {0}")]
    InvalidColor(String),
    #[error("snapshot unavailable: {0}")]
    Snapshot(String),
    #[error("config load failed: {0}")]
    Config(String),
    #[error("telemetry publish failed: {0}")]
    Telemetry(String),
}

impl HudError {
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type using HudError
pub type HudResult<T> = Result<T, HudError>;
