//! # Openspace Core
//!
//! Core logic for the Openspace patient chart.
//!
//! This crate contains pure chart operations:
//! - Patient resolution against the patient API, with a deterministic placeholder fallback
//! - Display defaulting (age, names, masked identifiers) kept in one place
//! - The per-session open-patient ledger and an in-memory session store
//! - The chart tab registry, content dispatch and sub-navigation
//! - HTML rendering of the chart page
//!
//! **No server concerns**: HTTP routing, cookies and process startup belong in `api-rest` and the
//! `openspace-run` binary.

pub mod chart;
pub mod config;
pub mod constants;
pub mod display;
pub mod encounter;
pub mod error;
pub mod escape;
pub mod ledger;
pub mod lookup;
pub mod patient;
pub mod render;
pub mod resolve;
pub mod session;
pub mod tabs;

pub use chart::{ChartContext, ChartOutcome, ChartPage, ChartPageController, ChartRequest};
pub use config::CoreConfig;
pub use constants::*;
pub use display::PatientDisplay;
pub use error::{ChartError, ChartResult};
pub use ledger::{ensure_open, OpenTabEntry, SessionContext};
pub use lookup::{HttpPatientLookup, LookupResponse, OfflinePatientLookup, PatientLookup};
pub use patient::PatientRecord;
pub use resolve::resolve_patient;
pub use session::{SessionId, SessionStore};
pub use tabs::{select_content, subnav_for, ChartTab, SubnavSet, TabMeta, CHART_TABS};

pub use openspace_types::PatientId;
