//! Top-level error types

use std::path::PathBuf;
use tc_records::RecordError;

/// Configuration loading and validation failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`crate::TrackingConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by the simulator and binary wiring
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Record(#[from] RecordError),

    /// Seed file for the simulator could not be read or parsed
    #[error("invalid records file {}: {reason}", path.display())]
    Records { path: PathBuf, reason: String },

    /// A global subscriber is already installed or the filter is bad
    #[error("failed to initialize tracing: {0}")]
    Telemetry(String),
}

impl TrackingError {
    /// Whether the error came from configuration
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
