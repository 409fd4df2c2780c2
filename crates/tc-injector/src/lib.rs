//! Script Injector - consent-gated tracking scripts
//!
//! Keeps the document's injected `<script>` elements in step with the
//! consent status and the page's tracking records:
//! - consent accepted: each record is injected once, in list order
//! - anything else: every injected element is removed and the state reset
//!
//! # Trust boundary
//!
//! Script bodies are attached verbatim, without sanitization or escaping.
//! They are authored by the account owner through the authenticated
//! settings pages and are trusted to run on that owner's customer pages.
//! Anything that lets a third party write tracking records bypasses this
//! boundary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod document;
pub mod injector;
pub mod settings;

pub use document::{DocumentError, MemoryDocument, ScriptDocument, ScriptElement};
pub use injector::{InjectionState, ReconcileReport, ScriptInjector};
pub use settings::InjectorSettings;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
