//! The consent store state machine
//!
//! States are `unset`, `accepted` and `rejected`. The initial state is
//! resolved from storage on [`ConsentStoreBuilder::load`]; afterwards the
//! only transitions are [`ConsentStore::accept_all`],
//! [`ConsentStore::reject_all`] and the expiry sweep performed by
//! [`ConsentStore::resolve_status`].

use crate::hook::{ConsentHook, LoggingConsentHook};
use crate::settings::ConsentSettings;
use crate::status::{ConsentDecision, ConsentStatus, ACCEPTED_MARKER, REJECTED_MARKER};
use crate::storage::KeyValueStorage;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tc_model::{Clock, SystemClock};

/// Builder wiring storages, clock, hook and settings into a [`ConsentStore`]
pub struct ConsentStoreBuilder {
    durable: Arc<dyn KeyValueStorage>,
    session: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    hook: Box<dyn ConsentHook>,
    settings: ConsentSettings,
}

impl ConsentStoreBuilder {
    /// Use a specific clock
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a specific consent hook
    #[must_use]
    pub fn hook(mut self, hook: impl ConsentHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Use specific settings
    #[must_use]
    pub fn settings(mut self, settings: ConsentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Initialize the store for a page load
    ///
    /// Resolves the status from storage. An `unset` status shows the
    /// prompt; any other status keeps it hidden and re-applies the decision
    /// through the hook.
    #[must_use]
    pub fn load(self) -> ConsentStore {
        let mut store = ConsentStore {
            durable: self.durable,
            session: self.session,
            clock: self.clock,
            hook: self.hook,
            settings: self.settings,
            status: ConsentStatus::Unset,
            prompt_visible: false,
        };

        let status = store.resolve_status();
        store.status = status;

        if status.is_decided() {
            tracing::debug!(%status, "re-applying stored consent decision");
            store.hook.on_consent_resolved(status.tracking_allowed());
        } else {
            store.prompt_visible = true;
        }

        store
    }
}

/// Cookie consent store for one page lifetime
pub struct ConsentStore {
    durable: Arc<dyn KeyValueStorage>,
    session: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    hook: Box<dyn ConsentHook>,
    settings: ConsentSettings,
    status: ConsentStatus,
    prompt_visible: bool,
}

impl ConsentStore {
    /// Start building a store over the given durable and session storages
    ///
    /// Defaults: wall clock, [`LoggingConsentHook`], default settings.
    #[must_use]
    pub fn builder(
        durable: Arc<dyn KeyValueStorage>,
        session: Arc<dyn KeyValueStorage>,
    ) -> ConsentStoreBuilder {
        ConsentStoreBuilder {
            durable,
            session,
            clock: Arc::new(SystemClock),
            hook: Box::new(LoggingConsentHook),
            settings: ConsentSettings::default(),
        }
    }

    /// Current in-memory status
    #[inline]
    #[must_use]
    pub fn status(&self) -> ConsentStatus {
        self.status
    }

    /// Whether tracking scripts may run
    #[inline]
    #[must_use]
    pub fn tracking_allowed(&self) -> bool {
        self.status.tracking_allowed()
    }

    /// Whether the consent prompt should be displayed
    #[inline]
    #[must_use]
    pub fn is_prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ConsentSettings {
        &self.settings
    }

    /// Current status with the durable expiry attached when accepted
    #[must_use]
    pub fn decision(&self) -> ConsentDecision {
        match self.status {
            ConsentStatus::Accepted => match self.read_expiry() {
                Some(expires_at) => ConsentDecision::accepted(expires_at),
                None => ConsentDecision {
                    status: ConsentStatus::Accepted,
                    expires_at: None,
                },
            },
            ConsentStatus::Rejected => ConsentDecision::rejected(),
            ConsentStatus::Unset => ConsentDecision::unset(),
        }
    }

    /// Compute the status from storage
    ///
    /// Durable storage is consulted first: a durable `accepted` marker with
    /// an expiry not yet passed wins over any session marker. An expiry in
    /// the past clears every consent marker, durable and session, and yields
    /// `unset`. Otherwise a session `rejected` marker yields `rejected`.
    ///
    /// A durable entry whose expiry is missing or unreadable is discarded.
    pub fn resolve_status(&self) -> ConsentStatus {
        let key = &self.settings.storage_key;
        let expiry_key = &self.settings.expiry_key;

        let marker = self.durable.get_item(key);
        let raw_expiry = self.durable.get_item(expiry_key);

        match (marker.as_deref(), raw_expiry) {
            (_, Some(raw)) => match parse_expiry(&raw) {
                Some(expires_at) if self.clock.now() > expires_at => {
                    tracing::info!(%expires_at, "consent expired, clearing stored decision");
                    self.clear_all();
                    return ConsentStatus::Unset;
                }
                Some(_) => {
                    if marker.as_deref() == Some(ACCEPTED_MARKER) {
                        return ConsentStatus::Accepted;
                    }
                    tracing::warn!("discarding consent expiry without accepted marker");
                    self.durable.remove_item(expiry_key);
                }
                None => {
                    tracing::warn!(raw = %raw, "discarding unreadable consent expiry");
                    self.durable.remove_item(key);
                    self.durable.remove_item(expiry_key);
                }
            },
            (Some(_), None) => {
                tracing::warn!("discarding consent marker without expiry");
                self.durable.remove_item(key);
            }
            (None, None) => {}
        }

        if self.session.get_item(key).as_deref() == Some(REJECTED_MARKER) {
            return ConsentStatus::Rejected;
        }

        ConsentStatus::Unset
    }

    /// Accept all cookies
    ///
    /// Persists `accepted` durably with an expiry of now + ttl, drops any
    /// session rejection, hides the prompt and enables tracking.
    pub fn accept_all(&mut self) {
        let now = self.clock.now();
        let expires_at = now.checked_add_signed(self.settings.ttl()).unwrap_or_else(|| {
            tracing::warn!(ttl_days = self.settings.ttl_days, "consent expiry out of range, clamping");
            DateTime::<Utc>::MAX_UTC
        });

        self.write(&*self.durable, &self.settings.storage_key, ACCEPTED_MARKER);
        self.write(
            &*self.durable,
            &self.settings.expiry_key,
            &expires_at.timestamp_millis().to_string(),
        );
        self.session.remove_item(&self.settings.storage_key);

        self.status = ConsentStatus::Accepted;
        self.prompt_visible = false;
        tracing::info!(%expires_at, "cookie consent accepted");
        self.hook.on_consent_resolved(true);
    }

    /// Reject all cookies
    ///
    /// Persists `rejected` for the session only, drops any durable
    /// acceptance, hides the prompt and disables tracking.
    pub fn reject_all(&mut self) {
        self.write(&*self.session, &self.settings.storage_key, REJECTED_MARKER);
        self.durable.remove_item(&self.settings.storage_key);
        self.durable.remove_item(&self.settings.expiry_key);

        self.status = ConsentStatus::Rejected;
        self.prompt_visible = false;
        tracing::info!("cookie consent rejected for this session");
        self.hook.on_consent_resolved(false);
    }

    fn read_expiry(&self) -> Option<DateTime<Utc>> {
        self.durable
            .get_item(&self.settings.expiry_key)
            .and_then(|raw| parse_expiry(&raw))
    }

    fn clear_all(&self) {
        self.durable.remove_item(&self.settings.storage_key);
        self.durable.remove_item(&self.settings.expiry_key);
        self.session.remove_item(&self.settings.storage_key);
    }

    fn write(&self, storage: &dyn KeyValueStorage, key: &str, value: &str) {
        if let Err(err) = storage.set_item(key, value) {
            tracing::warn!(key, error = %err, "failed to persist consent");
        }
    }
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentStore")
            .field("status", &self.status)
            .field("prompt_visible", &self.prompt_visible)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Parse an expiry stored as epoch milliseconds
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.trim().parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
