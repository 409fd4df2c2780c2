//! Testing utilities for the tracking codes workspace
//!
//! Shared fixtures: a pinned clock, a browsing-context harness over
//! in-memory storages, a hook that records signals, and record builders.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tc_consent::{ConsentHook, ConsentSettings, ConsentStore, ConsentStoreBuilder, MemoryStorage};
use tc_model::{ManualClock, OwnerId, RecordId, TrackingRecord};
use tc_records::{InMemoryTrackingCodeRepository, TrackingCodeInput, TrackingCodeService};

/// Instant every fixture clock starts at
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(epoch()))
}

/// Hook that remembers every signal it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingHook {
    signals: Arc<Mutex<Vec<bool>>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<bool> {
        self.signals.lock().clone()
    }

    pub fn last(&self) -> Option<bool> {
        self.signals.lock().last().copied()
    }
}

impl ConsentHook for RecordingHook {
    fn on_consent_resolved(&self, allowed: bool) {
        self.signals.lock().push(allowed);
    }
}

/// One browsing context: durable storage shared across tabs, session
/// storage local to this context, and a manual clock
#[derive(Debug, Clone)]
pub struct BrowsingContext {
    pub durable: Arc<MemoryStorage>,
    pub session: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
    pub settings: ConsentSettings,
}

impl BrowsingContext {
    pub fn new() -> Self {
        Self {
            durable: Arc::new(MemoryStorage::new()),
            session: Arc::new(MemoryStorage::new()),
            clock: fixed_clock(),
            settings: ConsentSettings::default(),
        }
    }

    /// Builder pre-wired with this context's storages and clock
    pub fn builder(&self) -> ConsentStoreBuilder {
        ConsentStore::builder(self.durable.clone(), self.session.clone())
            .clock(self.clock.clone())
            .settings(self.settings.clone())
    }

    /// Simulate a page load
    pub fn load(&self) -> ConsentStore {
        self.builder().load()
    }

    /// Simulate a page load with a recording hook
    pub fn load_recorded(&self) -> (ConsentStore, RecordingHook) {
        let hook = RecordingHook::new();
        (self.builder().hook(hook.clone()).load(), hook)
    }

    /// Close the browser session: session storage is dropped
    pub fn end_session(&self) {
        self.session.clear();
    }

    /// Another tab: same durable storage and clock, its own session
    pub fn new_tab(&self) -> Self {
        Self {
            durable: Arc::clone(&self.durable),
            session: Arc::new(MemoryStorage::new()),
            clock: Arc::clone(&self.clock),
            settings: self.settings.clone(),
        }
    }
}

impl Default for BrowsingContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn record(id: i64, name: &str, script: &str) -> TrackingRecord {
    TrackingRecord::new(RecordId(id), name, script)
}

pub fn sample_records() -> Vec<TrackingRecord> {
    vec![
        record(1, "Google Analytics", "window.dataLayer = window.dataLayer || [];"),
        record(2, "Meta Pixel", "fbq('init', '1234');"),
        record(3, "Hotjar", "hj('trigger', 'landing');"),
    ]
}

pub fn input(name: &str, script: &str) -> TrackingCodeInput {
    TrackingCodeInput::new(name, script)
}

pub type MemoryService = TrackingCodeService<InMemoryTrackingCodeRepository>;

/// Service over an empty in-memory repository driven by `clock`
pub fn memory_service(clock: Arc<ManualClock>) -> MemoryService {
    TrackingCodeService::new(InMemoryTrackingCodeRepository::with_clock(clock))
}

pub const OWNER_A: OwnerId = OwnerId(1);
pub const OWNER_B: OwnerId = OwnerId(2);
