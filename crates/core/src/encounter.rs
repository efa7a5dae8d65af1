//! Current-encounter banner data and sticky notes.
//!
//! Until the patient API exposes encounters, the banner shows a canned inpatient stay whose dates
//! are relative to the request time, and two canned sticky notes.

use crate::constants::{DISPLAY_DATETIME_FORMAT, DISPLAY_DATE_FORMAT};
use crate::display::PatientDisplay;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encounter {
    pub kind: String,
    pub status: String,
    pub admit_date: String,
    pub expected_discharge: Option<String>,
    pub department: String,
    pub room: String,
    pub bed: Option<String>,
    pub unit: String,
    pub nursing_station: Option<String>,
    pub attending_provider: String,
    pub primary_nurse: Option<String>,
    pub code_status: String,
    pub fall_risk: bool,
    pub isolation_type: Option<String>,
}

impl Encounter {
    /// The canned inpatient encounter: admitted two days before `now`, discharge expected three
    /// days after. Room and attending come from the patient display.
    pub fn current(display: &PatientDisplay, now: NaiveDateTime) -> Self {
        let date = |offset: Duration| (now + offset).format(DISPLAY_DATE_FORMAT).to_string();

        Self {
            kind: "Inpatient".into(),
            status: "Active".into(),
            admit_date: date(Duration::days(-2)),
            expected_discharge: Some(date(Duration::days(3))),
            department: "Medical ICU".into(),
            room: display.room.clone(),
            bed: Some("A".into()),
            unit: "ICU Tower 4".into(),
            nursing_station: Some("4T".into()),
            attending_provider: display.attending.clone(),
            primary_nurse: Some("RN Jessica Martinez".into()),
            code_status: "Full Code".into(),
            fall_risk: true,
            isolation_type: None,
        }
    }

    /// Two-letter photo badge: `IP`, `OP`, or the first two characters of the type.
    pub fn badge(&self) -> String {
        match self.kind.as_str() {
            "Inpatient" => "IP".into(),
            "Outpatient" => "OP".into(),
            other => other.chars().take(2).collect(),
        }
    }

    pub fn is_full_code(&self) -> bool {
        self.code_status == "Full Code"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotePriority {
    High,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickyNote {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub color: String,
    pub priority: NotePriority,
    pub created_by: String,
    pub created_at: String,
}

/// The canned sticky notes, timestamped relative to `now`.
pub fn sticky_notes(now: NaiveDateTime) -> Vec<StickyNote> {
    let stamp = |offset: Duration| {
        (now + offset)
            .format(DISPLAY_DATETIME_FORMAT)
            .to_string()
    };

    vec![
        StickyNote {
            id: 1,
            title: "NPO after midnight".into(),
            content: "Patient is NPO after midnight for procedure tomorrow".into(),
            color: "yellow".into(),
            priority: NotePriority::High,
            created_by: "Dr. Wilson".into(),
            created_at: stamp(Duration::hours(-4)),
        },
        StickyNote {
            id: 2,
            title: "Family contact".into(),
            content: "Daughter Jane (555-123-4567) is healthcare proxy".into(),
            color: "blue".into(),
            priority: NotePriority::Normal,
            created_by: "Care Coordinator".into(),
            created_at: stamp(Duration::days(-1)),
        },
    ]
}
