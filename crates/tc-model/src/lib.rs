//! Shared model types for the tracking codes workspace
//!
//! Provides the leaf types every other crate agrees on:
//! - [`RecordId`] / [`OwnerId`] identifiers
//! - [`TrackingRecord`], the read-only snippet handed to customer pages
//! - [`Clock`], so expiry and timestamps are testable without wall time

#![warn(unreachable_pub)]

pub mod clock;
pub mod record;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::{OwnerId, RecordId, TrackingRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
