//! Chart page orchestration.
//!
//! [`ChartPageController::handle`] runs one chart request end to end: routing guard, patient
//! resolution, display defaulting, ledger update, tab dispatch and rendering.

use crate::config::CoreConfig;
use crate::display::PatientDisplay;
use crate::encounter::{sticky_notes, Encounter, StickyNote};
use crate::ledger::{ensure_open, OpenTabEntry, SessionContext};
use crate::lookup::PatientLookup;
use crate::patient::PatientRecord;
use crate::render::{render_chart_page, ContentKind};
use crate::resolve::resolve_patient;
use crate::tabs::{requested_tab, select_content, subnav_for, SubnavSet};
use chrono::NaiveDateTime;
use openspace_types::PatientId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters of a chart request, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChartRequest {
    pub id: Option<String>,
    pub tab: Option<String>,
}

impl ChartRequest {
    /// Builds a request from raw query pairs.
    ///
    /// A repeated key keeps its last value; unrelated keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut request, (key, value)| {
                match key.as_ref() {
                    "id" => request.id = Some(value.into()),
                    "tab" => request.tab = Some(value.into()),
                    _ => {}
                }
                request
            })
    }
}

/// Everything a content renderer can draw on.
#[derive(Debug, Clone, Serialize)]
pub struct ChartContext {
    /// The id the chart was requested for.
    pub patient_id: PatientId,
    pub patient: PatientRecord,
    pub display: PatientDisplay,
    pub encounter: Encounter,
    pub sticky_notes: Vec<StickyNote>,
    /// Requested tab identifier after defaulting; may be unregistered.
    pub tab: String,
    pub open_patients: Vec<OpenTabEntry>,
    pub page_title: String,
}

/// A rendered chart page.
#[derive(Debug, Clone)]
pub struct ChartPage {
    pub context: ChartContext,
    pub content: ContentKind,
    pub subnav: SubnavSet,
    pub html: String,
}

/// Result of a chart request.
#[derive(Debug, Clone)]
pub enum ChartOutcome {
    /// No usable patient id: send the user to the patient list.
    Redirect(String),
    Page(Box<ChartPage>),
}

/// Orchestrates patient lookup, ledger and rendering for chart requests.
#[derive(Clone, Debug)]
pub struct ChartPageController<L> {
    cfg: Arc<CoreConfig>,
    lookup: L,
}

impl<L: PatientLookup> ChartPageController<L> {
    pub fn new(cfg: Arc<CoreConfig>, lookup: L) -> Self {
        Self { cfg, lookup }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Handles one chart request against the caller's session.
    ///
    /// Returns the outcome together with the session to store back. On redirect the session is
    /// returned unchanged and no patient data is loaded.
    pub async fn handle(
        &self,
        request: &ChartRequest,
        session: SessionContext,
        now: NaiveDateTime,
    ) -> (ChartOutcome, SessionContext) {
        let Some(patient_id) = request
            .id
            .as_deref()
            .and_then(|raw| PatientId::parse(raw).ok())
        else {
            tracing::debug!(raw_id = ?request.id, "chart request without a valid patient id");
            return (
                ChartOutcome::Redirect(self.cfg.patient_list_path().to_string()),
                session,
            );
        };

        let tab = requested_tab(request.tab.as_deref());
        let patient = resolve_patient(&self.lookup, patient_id).await;
        let display = PatientDisplay::build(&patient, now.date());
        let session = ensure_open(session, patient_id, display.name.clone());

        let context = ChartContext {
            patient_id,
            encounter: Encounter::current(&display, now),
            sticky_notes: sticky_notes(now),
            page_title: format!("{} - {}", display.name, self.cfg.app_name()),
            open_patients: session.open_patients().to_vec(),
            tab,
            patient,
            display,
        };

        let renderer = select_content(&context.tab);
        let subnav = subnav_for(&context.tab);
        let html = render_chart_page(&context, renderer, subnav);

        tracing::info!(
            patient_id = %patient_id,
            tab = %context.tab,
            content = ?renderer.kind(),
            "rendered patient chart"
        );

        let page = ChartPage {
            content: renderer.kind(),
            subnav,
            html,
            context,
        };
        (ChartOutcome::Page(Box::new(page)), session)
    }
}
