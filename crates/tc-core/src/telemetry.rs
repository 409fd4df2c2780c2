//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::error::TrackingError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. Output goes to
/// stderr so reports on stdout stay machine-readable.
///
/// # Errors
/// [`TrackingError::Telemetry`] when a global subscriber is already set
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TrackingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|err| TrackingError::Telemetry(err.to_string()))
}
