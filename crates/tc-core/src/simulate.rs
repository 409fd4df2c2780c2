//! Scripted consent and injection session
//!
//! Seeds tracking codes through the CRUD service, then walks one browsing
//! context through a fixed sequence of visits: first visit, accept, reload,
//! session end, reject, and expiry of an acceptance. Each visit is recorded
//! as a [`SimulationStep`] and checked against the consent rules.

use crate::config::TrackingConfig;
use crate::error::TrackingError;
use crate::page::CustomerPage;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tc_consent::{ConsentStatus, ConsentStore, MemoryStorage};
use tc_injector::{MemoryDocument, ScriptDocument, ScriptInjector};
use tc_model::{ManualClock, OwnerId, RecordId, TrackingRecord};
use tc_records::{
    InMemoryTrackingCodeRepository, TrackingCodeInput, TrackingCodeService, ValidationErrors,
};

/// Owner the simulator seeds records for
pub const SIMULATION_OWNER: OwnerId = OwnerId(1);

/// Inputs used when no seed file is given
#[must_use]
pub fn default_seeds() -> Vec<TrackingCodeInput> {
    vec![
        TrackingCodeInput::new(
            "Google Analytics",
            "window.dataLayer = window.dataLayer || []; gtag('js', new Date());",
        ),
        TrackingCodeInput::new("Meta Pixel", "fbq('init', '000000000000000'); fbq('track', 'PageView');"),
        TrackingCodeInput::new("Hotjar", "hj('trigger', 'landing');"),
    ]
}

/// Read seed inputs from a JSON array of `{ "name", "script_content" }`
///
/// # Errors
/// [`TrackingError::Records`] when the file is unreadable or malformed
pub fn load_seeds(path: impl AsRef<Path>) -> Result<Vec<TrackingCodeInput>, TrackingError> {
    let path = path.as_ref();
    let failed = |reason: String| TrackingError::Records {
        path: path.to_path_buf(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|err| failed(err.to_string()))?;
    serde_json::from_str(&raw).map_err(|err| failed(err.to_string()))
}

/// Seed input refused by validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedSeed {
    /// Position in the seed list
    pub index: usize,
    pub errors: ValidationErrors,
}

/// Snapshot after one visit or action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationStep {
    pub label: String,
    pub status: ConsentStatus,
    pub prompt_visible: bool,
    pub injected: Vec<RecordId>,
    pub removed: usize,
    pub scripts_in_document: usize,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub seeded: usize,
    pub rejected_seeds: Vec<RejectedSeed>,
    pub steps: Vec<SimulationStep>,
    pub violations: Vec<String>,
}

impl SimulationReport {
    /// Whether every step respected the consent rules
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Tracking Codes Simulation");
        let _ = writeln!(out, "=========================");
        let _ = writeln!(out, "Seeded records: {}", self.seeded);
        for rejected in &self.rejected_seeds {
            let _ = writeln!(out, "  seed #{} rejected: {}", rejected.index, rejected.errors);
        }
        let _ = writeln!(out);

        for step in &self.steps {
            let _ = writeln!(
                out,
                "{:<28} status={:<8} prompt={:<5} injected={} removed={} scripts={}",
                step.label,
                step.status,
                step.prompt_visible,
                step.injected.len(),
                step.removed,
                step.scripts_in_document,
            );
        }

        let _ = writeln!(out);
        if self.passed() {
            let _ = writeln!(out, "Status: PASSED");
        } else {
            let _ = writeln!(out, "Status: FAILED");
            for violation in &self.violations {
                let _ = writeln!(out, "  - {violation}");
            }
        }
        out
    }
}

/// Runs the scripted session against in-memory adapters
#[derive(Debug)]
pub struct Simulator {
    config: TrackingConfig,
    clock: Arc<ManualClock>,
}

impl Simulator {
    /// Simulator starting at the current time
    #[must_use]
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            clock: Arc::new(ManualClock::new(Utc::now())),
        }
    }

    /// Drive time from a specific clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<ManualClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed records and run every visit
    ///
    /// # Errors
    /// Repository failures while seeding. Validation failures are reported
    /// in [`SimulationReport::rejected_seeds`] instead.
    pub async fn run(&self, seeds: &[TrackingCodeInput]) -> Result<SimulationReport, TrackingError> {
        let mut report = SimulationReport::default();
        let records = self.seed(seeds, &mut report).await?;
        let expected = records.iter().filter(|r| r.has_script()).count();
        tracing::info!(records = records.len(), "starting simulated browsing session");

        let durable = Arc::new(MemoryStorage::new());
        let session = Arc::new(MemoryStorage::new());

        let mut page = self.visit(&durable, &session, &records);
        self.record(&mut report, "first visit", &page, expected);

        page.accept_all();
        self.record(&mut report, "accept all", &page, expected);

        let page = self.visit(&durable, &session, &records);
        self.record(&mut report, "reload", &page, expected);

        session.clear();
        let mut page = self.visit(&durable, &session, &records);
        self.record(&mut report, "new session", &page, expected);

        page.reject_all();
        self.record(&mut report, "reject all", &page, expected);

        let page = self.visit(&durable, &session, &records);
        self.record(&mut report, "reload after reject", &page, expected);

        session.clear();
        let mut page = self.visit(&durable, &session, &records);
        self.record(&mut report, "new session after reject", &page, expected);

        page.accept_all();
        self.record(&mut report, "accept again", &page, expected);

        self.clock
            .advance(Duration::days(i64::from(self.config.consent.ttl_days)) + Duration::seconds(1));
        let page = self.visit(&durable, &session, &records);
        self.record(&mut report, "visit after expiry", &page, expected);

        if report.passed() {
            tracing::info!(steps = report.steps.len(), "simulation passed");
        } else {
            tracing::warn!(violations = report.violations.len(), "simulation found violations");
        }
        Ok(report)
    }

    async fn seed(
        &self,
        seeds: &[TrackingCodeInput],
        report: &mut SimulationReport,
    ) -> Result<Vec<TrackingRecord>, TrackingError> {
        let service = TrackingCodeService::new(InMemoryTrackingCodeRepository::with_clock(
            self.clock.clone(),
        ))
        .with_settings(self.config.records);

        for (index, input) in seeds.iter().enumerate() {
            match service.store(SIMULATION_OWNER, input).await {
                Ok(_) => report.seeded += 1,
                Err(err) => match err.validation_errors() {
                    Some(errors) => report.rejected_seeds.push(RejectedSeed {
                        index,
                        errors: errors.clone(),
                    }),
                    None => return Err(err.into()),
                },
            }
            self.clock.advance(Duration::seconds(1));
        }

        Ok(service.page_records(SIMULATION_OWNER).await?)
    }

    fn visit(
        &self,
        durable: &Arc<MemoryStorage>,
        session: &Arc<MemoryStorage>,
        records: &[TrackingRecord],
    ) -> CustomerPage<MemoryDocument> {
        let consent = ConsentStore::builder(durable.clone(), session.clone())
            .clock(self.clock.clone())
            .settings(self.config.consent.clone());
        CustomerPage::load(
            consent,
            ScriptInjector::with_settings(self.config.injector.clone()),
            MemoryDocument::new(),
            records.to_vec(),
        )
    }

    fn record(
        &self,
        report: &mut SimulationReport,
        label: &str,
        page: &CustomerPage<MemoryDocument>,
        expected: usize,
    ) {
        let last = page.last_report();
        let step = SimulationStep {
            label: label.to_string(),
            status: page.status(),
            prompt_visible: page.is_prompt_visible(),
            injected: last.injected.clone(),
            removed: last.removed,
            scripts_in_document: page
                .document()
                .scripts_with(&self.config.injector.id_attribute)
                .len(),
        };

        if let Some(violation) = check_step(&step, expected) {
            tracing::warn!(label, %violation, "consent rule violated");
            report.violations.push(format!("{label}: {violation}"));
        }
        report.steps.push(step);
    }
}

fn check_step(step: &SimulationStep, expected: usize) -> Option<String> {
    match step.status {
        ConsentStatus::Unset if !step.prompt_visible => Some("prompt hidden while undecided".into()),
        ConsentStatus::Accepted | ConsentStatus::Rejected if step.prompt_visible => {
            Some("prompt shown after a decision".into())
        }
        ConsentStatus::Accepted if step.scripts_in_document != expected => Some(format!(
            "{} scripts attached, expected {expected}",
            step.scripts_in_document
        )),
        ConsentStatus::Unset | ConsentStatus::Rejected if step.scripts_in_document > 0 => Some(format!(
            "{} scripts attached without consent",
            step.scripts_in_document
        )),
        _ => None,
    }
}
