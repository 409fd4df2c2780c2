//! Tracking Codes Core
//!
//! Ties the workspace together:
//! - Loads and validates [`TrackingConfig`] from TOML
//! - Installs the tracing subscriber
//! - Wires consent, injection and records into a [`CustomerPage`]
//! - Runs scripted browsing sessions through the [`Simulator`]
//!
//! # Example
//!
//! ```rust,ignore
//! use tc_core::{Simulator, TrackingConfig, simulate::default_seeds};
//!
//! # async fn example() -> Result<(), tc_core::TrackingError> {
//! let config = TrackingConfig::load("tracking.toml")?;
//! let report = Simulator::new(config).run(&default_seeds()).await?;
//! assert!(report.passed());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod page;
pub mod simulate;
pub mod telemetry;

pub use config::{LoggingConfig, TrackingConfig};
pub use error::{ConfigError, TrackingError};
pub use page::CustomerPage;
pub use simulate::{RejectedSeed, SimulationReport, SimulationStep, Simulator};
pub use telemetry::init_tracing;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding tracking codes
    pub use crate::{CustomerPage, TrackingConfig, TrackingError};
    pub use tc_consent::{ConsentStatus, ConsentStore, KeyValueStorage, MemoryStorage};
    pub use tc_injector::{MemoryDocument, ScriptDocument, ScriptInjector};
    pub use tc_model::{OwnerId, RecordId, TrackingRecord};
    pub use tc_records::{TrackingCodeInput, TrackingCodeService};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
