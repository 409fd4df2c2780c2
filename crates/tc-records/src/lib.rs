//! Tracking code records - owner-scoped CRUD backend
//!
//! Serves the settings pages where an account owner manages named script
//! snippets:
//! - list with case-insensitive name search, newest first
//! - create / update with field-scoped validation
//! - edit / update / delete guarded by an ownership predicate that reports
//!   "not yours" exactly like "does not exist"
//!
//! Persistence sits behind [`TrackingCodeRepository`];
//! [`InMemoryTrackingCodeRepository`] backs tests and simulations.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod authorization;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

pub use authorization::authorize;
pub use error::RecordError;
pub use model::{
    Flash, FlashKind, IndexFilters, Saved, TrackingCode, TrackingCodeForm, TrackingCodeIndex,
    TrackingCodeSummary,
};
pub use repository::{InMemoryTrackingCodeRepository, TrackingCodeRepository};
pub use service::TrackingCodeService;
pub use validation::{Field, RecordSettings, TrackingCodeInput, ValidTrackingCode, ValidationErrors};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
