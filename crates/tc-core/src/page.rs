//! Customer-facing page wiring
//!
//! A [`CustomerPage`] is one page lifetime: it loads consent, then keeps the
//! injected scripts in step with every consent change and every new set of
//! records handed to it by navigation.

use tc_consent::{ConsentStatus, ConsentStore, ConsentStoreBuilder};
use tc_injector::{ReconcileReport, ScriptDocument, ScriptInjector};
use tc_model::TrackingRecord;

/// Consent store, injector and document for one page lifetime
pub struct CustomerPage<D> {
    consent: ConsentStore,
    injector: ScriptInjector,
    document: D,
    records: Vec<TrackingRecord>,
    last_report: ReconcileReport,
}

impl<D: ScriptDocument> CustomerPage<D> {
    /// Load the page: resolve consent and run the first reconciliation
    #[must_use]
    pub fn load(
        consent: ConsentStoreBuilder,
        injector: ScriptInjector,
        document: D,
        records: Vec<TrackingRecord>,
    ) -> Self {
        let mut page = Self {
            consent: consent.load(),
            injector,
            document,
            records,
            last_report: ReconcileReport::default(),
        };
        page.reconcile();
        page
    }

    /// Banner "Accept all" action
    pub fn accept_all(&mut self) -> &ReconcileReport {
        self.consent.accept_all();
        self.reconcile()
    }

    /// Banner "Reject all" action
    pub fn reject_all(&mut self) -> &ReconcileReport {
        self.consent.reject_all();
        self.reconcile()
    }

    /// Replace the records, as after navigating to a page with different props
    pub fn set_records(&mut self, records: Vec<TrackingRecord>) -> &ReconcileReport {
        self.records = records;
        self.reconcile()
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> ConsentStatus {
        self.consent.status()
    }

    /// Whether the consent banner is showing
    #[inline]
    #[must_use]
    pub fn is_prompt_visible(&self) -> bool {
        self.consent.is_prompt_visible()
    }

    #[inline]
    #[must_use]
    pub fn consent(&self) -> &ConsentStore {
        &self.consent
    }

    #[inline]
    #[must_use]
    pub fn injector(&self) -> &ScriptInjector {
        &self.injector
    }

    #[inline]
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TrackingRecord] {
        &self.records
    }

    /// Report of the most recent reconciliation
    #[inline]
    #[must_use]
    pub fn last_report(&self) -> &ReconcileReport {
        &self.last_report
    }

    fn reconcile(&mut self) -> &ReconcileReport {
        self.last_report =
            self.injector
                .reconcile(self.consent.status(), &self.records, &mut self.document);
        &self.last_report
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for CustomerPage<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerPage")
            .field("consent", &self.consent)
            .field("injector", &self.injector)
            .field("document", &self.document)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}
