//! Reconciliation of injected scripts against consent and records

use crate::document::{DocumentError, ScriptDocument};
use crate::settings::InjectorSettings;
use std::collections::HashSet;
use tc_consent::ConsentStatus;
use tc_model::{RecordId, TrackingRecord};

/// Record ids whose script is attached for the current page lifetime
///
/// Non-empty only while consent is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionState {
    ids: HashSet<RecordId>,
}

impl InjectionState {
    /// Whether `id` has been injected
    #[inline]
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of injected records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is injected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Injected ids in ascending order
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records attached in this pass, in list order
    pub injected: Vec<RecordId>,
    /// Records already attached earlier in this continuity
    pub skipped_existing: Vec<RecordId>,
    /// Records whose script body was blank
    pub skipped_empty: Vec<RecordId>,
    /// Records whose element could not be created or attached
    pub failed: Vec<RecordId>,
    /// Elements removed by teardown
    pub removed: usize,
}

impl ReconcileReport {
    /// Whether the pass changed nothing in the document
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.injected.is_empty() && self.removed == 0
    }
}

/// Keeps injected script elements consistent with consent and records
#[derive(Debug, Clone, Default)]
pub struct ScriptInjector {
    settings: InjectorSettings,
    state: InjectionState,
}

impl ScriptInjector {
    /// Injector with default attributes
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Injector with specific attributes
    #[inline]
    #[must_use]
    pub fn with_settings(settings: InjectorSettings) -> Self {
        Self {
            settings,
            state: InjectionState::default(),
        }
    }

    /// Current injection state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &InjectionState {
        &self.state
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &InjectorSettings {
        &self.settings
    }

    /// Make the document match `status` and `records`
    ///
    /// Not accepted: remove every tagged script and forget all ids.
    /// Accepted: inject each record not yet injected, in list order,
    /// skipping blank bodies. A record that fails is logged and skipped;
    /// the pass always runs to the end of the list.
    pub fn reconcile<D>(
        &mut self,
        status: ConsentStatus,
        records: &[TrackingRecord],
        document: &mut D,
    ) -> ReconcileReport
    where
        D: ScriptDocument + ?Sized,
    {
        let mut report = ReconcileReport::default();

        if !status.tracking_allowed() {
            report.removed = self.teardown(document);
            return report;
        }

        for record in records {
            if self.state.contains(record.id) {
                report.skipped_existing.push(record.id);
                continue;
            }

            if !record.has_script() {
                tracing::warn!(id = %record.id, name = %record.name, "empty script content, skipping tracking code");
                report.skipped_empty.push(record.id);
                continue;
            }

            match self.inject(record, document) {
                Ok(()) => {
                    self.state.ids.insert(record.id);
                    report.injected.push(record.id);
                    tracing::info!(id = %record.id, name = %record.name, "tracking code executed");
                }
                Err(err) => {
                    tracing::error!(id = %record.id, name = %record.name, error = %err, "tracking code injection failed");
                    report.failed.push(record.id);
                }
            }
        }

        report
    }

    fn inject<D>(&self, record: &TrackingRecord, document: &mut D) -> Result<(), DocumentError>
    where
        D: ScriptDocument + ?Sized,
    {
        let mut element = document.create_script(&record.script_body)?;
        element.set_attribute(&self.settings.id_attribute, record.id.to_string());
        element.set_attribute(&self.settings.name_attribute, record.name.clone());
        document.append_to_head(element)
    }

    fn teardown<D>(&mut self, document: &mut D) -> usize
    where
        D: ScriptDocument + ?Sized,
    {
        let removed = document.remove_scripts_with(&self.settings.id_attribute);
        if removed > 0 {
            tracing::info!(removed, "removed tracking scripts");
        }
        self.state.ids.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use pretty_assertions::assert_eq;

    fn records() -> Vec<TrackingRecord> {
        vec![
            TrackingRecord::new(RecordId(1), "Analytics", "gtag('config')"),
            TrackingRecord::new(RecordId(2), "Pixel", "fbq('init')"),
        ]
    }

    #[test]
    fn accepted_injects_in_list_order_with_tags() {
        let mut doc = MemoryDocument::new();
        let mut injector = ScriptInjector::new();

        let report = injector.reconcile(ConsentStatus::Accepted, &records(), &mut doc);

        assert_eq!(report.injected, vec![RecordId(1), RecordId(2)]);
        assert_eq!(doc.executed(), ["gtag('config')", "fbq('init')"]);
        let first = &doc.head()[0];
        assert_eq!(first.attribute("data-tracking-code-id"), Some("1"));
        assert_eq!(first.attribute("data-tracking-code-name"), Some("Analytics"));
        assert_eq!(injector.state().ids(), vec![RecordId(1), RecordId(2)]);
    }

    #[test]
    fn script_text_is_attached_verbatim() {
        let mut doc = MemoryDocument::new();
        let record = TrackingRecord::new(RecordId(1), "raw", "\n  track('</b>');\n");
        ScriptInjector::new().reconcile(ConsentStatus::Accepted, &[record], &mut doc);
        assert_eq!(doc.head()[0].text(), "\n  track('</b>');\n");
    }

    #[test]
    fn second_pass_is_noop() {
        let mut doc = MemoryDocument::new();
        let mut injector = ScriptInjector::new();
        injector.reconcile(ConsentStatus::Accepted, &records(), &mut doc);

        let report = injector.reconcile(ConsentStatus::Accepted, &records(), &mut doc);
        assert!(report.is_noop());
        assert_eq!(report.skipped_existing, vec![RecordId(1), RecordId(2)]);
        assert_eq!(doc.head().len(), 2);
    }

    #[test]
    fn duplicate_ids_in_one_list_inject_once() {
        let mut doc = MemoryDocument::new();
        let list = vec![
            TrackingRecord::new(RecordId(5), "a", "a()"),
            TrackingRecord::new(RecordId(5), "a again", "a2()"),
        ];
        let report = ScriptInjector::new().reconcile(ConsentStatus::Accepted, &list, &mut doc);
        assert_eq!(report.injected, vec![RecordId(5)]);
        assert_eq!(doc.executed(), ["a()"]);
    }

    #[test]
    fn unset_and_rejected_tear_down() {
        for status in [ConsentStatus::Rejected, ConsentStatus::Unset] {
            let mut doc = MemoryDocument::new();
            let mut injector = ScriptInjector::new();
            injector.reconcile(ConsentStatus::Accepted, &records(), &mut doc);

            let report = injector.reconcile(status, &records(), &mut doc);
            assert_eq!(report.removed, 2);
            assert!(report.injected.is_empty());
            assert!(injector.state().is_empty());
            assert!(doc.head().is_empty());
        }
    }

    #[test]
    fn teardown_without_scripts_is_noop() {
        let mut doc = MemoryDocument::new();
        let report = ScriptInjector::new().reconcile(ConsentStatus::Rejected, &records(), &mut doc);
        assert!(report.is_noop());
    }

    #[test]
    fn blank_body_is_skipped_not_fatal() {
        let mut doc = MemoryDocument::new();
        let list = vec![
            TrackingRecord::new(RecordId(1), "blank", "  \n "),
            TrackingRecord::new(RecordId(2), "ok", "ok()"),
        ];
        let mut injector = ScriptInjector::new();
        let report = injector.reconcile(ConsentStatus::Accepted, &list, &mut doc);

        assert_eq!(report.skipped_empty, vec![RecordId(1)]);
        assert_eq!(report.injected, vec![RecordId(2)]);
        assert!(!injector.state().contains(RecordId(1)));
    }

    #[test]
    fn failures_do_not_abort_the_pass() {
        let mut doc = MemoryDocument::new()
            .reject_create_when(|e| e.text() == "boom()")
            .reject_attach_when(|e| e.attribute("data-tracking-code-name") == Some("detached"));
        let list = vec![
            TrackingRecord::new(RecordId(1), "explodes", "boom()"),
            TrackingRecord::new(RecordId(2), "detached", "d()"),
            TrackingRecord::new(RecordId(3), "fine", "fine()"),
        ];
        let mut injector = ScriptInjector::new();
        let report = injector.reconcile(ConsentStatus::Accepted, &list, &mut doc);

        assert_eq!(report.failed, vec![RecordId(1), RecordId(2)]);
        assert_eq!(report.injected, vec![RecordId(3)]);
        assert_eq!(injector.state().ids(), vec![RecordId(3)]);
    }

    #[test]
    fn custom_attributes_drive_tagging_and_teardown() {
        let settings = InjectorSettings {
            id_attribute: "data-tc".to_string(),
            name_attribute: "data-tc-name".to_string(),
        };
        let mut doc = MemoryDocument::new();
        let mut injector = ScriptInjector::with_settings(settings);
        injector.reconcile(ConsentStatus::Accepted, &records(), &mut doc);
        assert_eq!(doc.scripts_with("data-tc").len(), 2);
        assert!(doc.scripts_with("data-tracking-code-id").is_empty());

        let report = injector.reconcile(ConsentStatus::Rejected, &records(), &mut doc);
        assert_eq!(report.removed, 2);
    }
}
