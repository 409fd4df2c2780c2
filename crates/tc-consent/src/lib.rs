//! Consent Store - cookie consent decision for customer pages
//!
//! Single source of truth for the visitor's consent decision:
//! - `accepted` is persisted durably with an expiry (30 days by default)
//! - `rejected` lives in session storage only and dies with the session
//! - expired decisions are swept eagerly when status is resolved
//! - a [`ConsentHook`] is told whenever tracking becomes allowed or not
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tc_consent::{ConsentStore, MemoryStorage};
//!
//! let durable = Arc::new(MemoryStorage::new());
//! let session = Arc::new(MemoryStorage::new());
//!
//! let mut store = ConsentStore::builder(durable, session).load();
//! assert!(store.is_prompt_visible());
//!
//! store.accept_all();
//! assert!(store.tracking_allowed());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod hook;
pub mod settings;
pub mod status;
pub mod storage;
pub mod store;

pub use hook::{ConsentHook, FnHook, LoggingConsentHook};
pub use settings::ConsentSettings;
pub use status::{ConsentDecision, ConsentStatus};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use store::{ConsentStore, ConsentStoreBuilder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
