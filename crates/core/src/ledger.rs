//! Open-patient tab ledger.
//!
//! Each user session keeps the ordered list of patients whose charts have been opened. The
//! ledger is an explicit value: callers load it from the session store, pass it through
//! [`ensure_open`], and store the result back.
//!
//! Invariant: no two entries share a patient id. Entries are kept in order of first open and are
//! never renamed, so a patient whose name changes after first open keeps the original label.

use openspace_types::PatientId;
use serde::{Deserialize, Serialize};

/// One open patient tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTabEntry {
    #[serde(rename = "id")]
    pub patient_id: PatientId,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// Per-session state owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    open_patients: Vec<OpenTabEntry>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open tabs in first-open order.
    pub fn open_patients(&self) -> &[OpenTabEntry] {
        &self.open_patients
    }

    pub fn is_open(&self, patient_id: PatientId) -> bool {
        self.open_patients
            .iter()
            .any(|entry| entry.patient_id == patient_id)
    }

    /// Appends `(patient_id, display_name)` unless an entry with that id already exists.
    ///
    /// Returns `true` when an entry was added. An existing entry is left untouched, including
    /// its display name.
    pub fn ensure_open(&mut self, patient_id: PatientId, display_name: impl Into<String>) -> bool {
        if self.is_open(patient_id) {
            return false;
        }

        self.open_patients.push(OpenTabEntry {
            patient_id,
            display_name: display_name.into(),
        });
        true
    }
}

/// Value-passing form of [`SessionContext::ensure_open`].
///
/// Idempotent: applying it twice with the same arguments yields the same ledger as applying it
/// once.
pub fn ensure_open(
    mut session: SessionContext,
    patient_id: PatientId,
    display_name: impl Into<String>,
) -> SessionContext {
    session.ensure_open(patient_id, display_name);
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> PatientId {
        PatientId::new(n).unwrap()
    }

    #[test]
    fn test_ensure_open_appends_to_empty_ledger() {
        let session = ensure_open(SessionContext::new(), id(1), "Smith, John");

        assert_eq!(
            session.open_patients(),
            &[OpenTabEntry {
                patient_id: id(1),
                display_name: "Smith, John".into()
            }]
        );
    }

    #[test]
    fn test_ensure_open_is_idempotent() {
        let once = ensure_open(SessionContext::new(), id(3), "Doe, Jane");
        let twice = ensure_open(once.clone(), id(3), "Doe, Jane");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ensure_open_keeps_first_name_seen() {
        let mut session = SessionContext::new();
        assert!(session.ensure_open(id(3), "Doe, Jane"));
        assert!(!session.ensure_open(id(3), "Doe-Smith, Jane"));

        assert_eq!(session.open_patients().len(), 1);
        assert_eq!(session.open_patients()[0].display_name, "Doe, Jane");
    }

    #[test]
    fn test_ensure_open_preserves_first_open_order() {
        let mut session = SessionContext::new();
        for (n, name) in [(5, "E"), (2, "B"), (5, "E2"), (9, "I"), (2, "B2")] {
            session.ensure_open(id(n), name);
        }

        let ids: Vec<u64> = session
            .open_patients()
            .iter()
            .map(|e| e.patient_id.get())
            .collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_ids_match_across_representations() {
        // Ledger stored with a numeric id, looked up with a textual one.
        let stored: SessionContext =
            serde_json::from_str(r#"{"open_patients":[{"id":7,"name":"Smith, John"}]}"#).unwrap();
        let session = ensure_open(stored, PatientId::parse("7").unwrap(), "Other, Name");

        assert_eq!(session.open_patients().len(), 1);

        let stored_as_text: SessionContext =
            serde_json::from_str(r#"{"open_patients":[{"id":"7","name":"Smith, John"}]}"#)
                .unwrap();
        assert_eq!(stored_as_text, session);
    }

    #[test]
    fn test_missing_ledger_deserializes_as_empty() {
        let session: SessionContext = serde_json::from_str("{}").unwrap();
        assert!(session.open_patients().is_empty());
    }
}
