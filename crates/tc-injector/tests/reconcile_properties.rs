//! Reconciliation properties against arbitrary record lists and consent flips

use proptest::prelude::*;
use std::collections::HashSet;
use tc_consent::ConsentStatus;
use tc_injector::{MemoryDocument, ScriptDocument, ScriptElement, ScriptInjector};
use tc_model::{RecordId, TrackingRecord};
use tc_test_utils::{sample_records, BrowsingContext};

const ID_ATTR: &str = "data-tracking-code-id";

fn tagged_ids(doc: &MemoryDocument) -> Vec<String> {
    doc.scripts_with(ID_ATTR)
        .iter()
        .filter_map(|e| e.attribute(ID_ATTR).map(str::to_string))
        .collect()
}

#[test]
fn accepted_to_rejected_removes_everything() {
    let ctx = BrowsingContext::new();
    let mut store = ctx.load();
    let mut doc = MemoryDocument::new();
    let mut injector = ScriptInjector::new();
    let records = sample_records();

    store.accept_all();
    injector.reconcile(store.status(), &records, &mut doc);
    assert_eq!(tagged_ids(&doc), vec!["1", "2", "3"]);

    store.reject_all();
    let report = injector.reconcile(store.status(), &records, &mut doc);
    assert_eq!(report.removed, 3);
    assert!(tagged_ids(&doc).is_empty());
    assert!(injector.state().is_empty());
}

#[test]
fn rejected_session_revisit_injects_nothing() {
    let ctx = BrowsingContext::new();
    ctx.load().reject_all();

    let revisit = ctx.load();
    let mut doc = MemoryDocument::new();
    let report = ScriptInjector::new().reconcile(revisit.status(), &sample_records(), &mut doc);

    assert!(report.injected.is_empty());
    assert!(doc.executed().is_empty());
}

#[test]
fn re_accepting_starts_a_fresh_continuity() {
    let mut doc = MemoryDocument::new();
    let mut injector = ScriptInjector::new();
    let records = sample_records();

    injector.reconcile(ConsentStatus::Accepted, &records, &mut doc);
    injector.reconcile(ConsentStatus::Rejected, &records, &mut doc);
    let report = injector.reconcile(ConsentStatus::Accepted, &records, &mut doc);

    assert_eq!(report.injected.len(), 3);
    assert_eq!(doc.executed().len(), 6);
    assert_eq!(tagged_ids(&doc).len(), 3);
}

#[test]
fn teardown_leaves_untagged_scripts_alone() {
    let mut doc = MemoryDocument::new();
    doc.append_to_head(ScriptElement::new("bootstrapApp()")).unwrap();
    let mut injector = ScriptInjector::new();

    injector.reconcile(ConsentStatus::Accepted, &sample_records(), &mut doc);
    injector.reconcile(ConsentStatus::Unset, &sample_records(), &mut doc);

    assert_eq!(doc.head().len(), 1);
    assert_eq!(doc.head()[0].text(), "bootstrapApp()");
}

#[test]
fn new_records_on_navigation_are_added_without_duplicates() {
    let mut doc = MemoryDocument::new();
    let mut injector = ScriptInjector::new();
    let mut records = sample_records();
    injector.reconcile(ConsentStatus::Accepted, &records, &mut doc);

    records.push(TrackingRecord::new(RecordId(4), "LinkedIn", "_linkedin()"));
    let report = injector.reconcile(ConsentStatus::Accepted, &records, &mut doc);

    assert_eq!(report.injected, vec![RecordId(4)]);
    assert_eq!(tagged_ids(&doc), vec!["1", "2", "3", "4"]);
}

fn arb_records() -> impl Strategy<Value = Vec<TrackingRecord>> {
    proptest::collection::vec(
        (0i64..12, "[a-z]{1,8}", prop_oneof!["[a-z()';]{1,16}", Just("   ".to_string())]),
        0..16,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(id, name, body)| TrackingRecord::new(RecordId(id), name, body))
            .collect()
    })
}

fn arb_status() -> impl Strategy<Value = ConsentStatus> {
    prop_oneof![
        Just(ConsentStatus::Unset),
        Just(ConsentStatus::Accepted),
        Just(ConsentStatus::Rejected),
    ]
}

proptest! {
    /// Two accepted passes over the same list leave one element per
    /// injectable id.
    #[test]
    fn prop_accepted_reconcile_is_idempotent(records in arb_records()) {
        let mut doc = MemoryDocument::new();
        let mut injector = ScriptInjector::new();

        injector.reconcile(ConsentStatus::Accepted, &records, &mut doc);
        let second = injector.reconcile(ConsentStatus::Accepted, &records, &mut doc);
        prop_assert!(second.injected.is_empty());

        let expected: HashSet<String> = records
            .iter()
            .filter(|r| r.has_script())
            .map(|r| r.id.to_string())
            .collect();
        let ids = tagged_ids(&doc);
        let unique: HashSet<String> = ids.iter().cloned().collect();

        prop_assert_eq!(ids.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    /// The injection state always mirrors the tagged elements, and is empty
    /// whenever consent is not accepted.
    #[test]
    fn prop_state_mirrors_document(
        steps in proptest::collection::vec((arb_status(), arb_records()), 1..12)
    ) {
        let mut doc = MemoryDocument::new();
        let mut injector = ScriptInjector::new();

        for (status, records) in steps {
            injector.reconcile(status, &records, &mut doc);

            let in_state: Vec<String> = injector.state().ids().iter().map(ToString::to_string).collect();
            let mut in_doc = tagged_ids(&doc);
            in_doc.sort_by_key(|id| id.parse::<i64>().unwrap_or_default());

            prop_assert_eq!(in_state, in_doc);
            if status != ConsentStatus::Accepted {
                prop_assert!(injector.state().is_empty());
            }
        }
    }
}
