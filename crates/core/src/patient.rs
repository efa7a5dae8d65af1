//! Patient records as consumed by the chart page.
//!
//! A [`PatientRecord`] is built fresh for every request, either from the patient API payload or
//! as a deterministic placeholder when the lookup fails. Every field apart from the identifier
//! is optional; turning missing values into display text is the job of
//! [`crate::display::PatientDisplay`].

use crate::constants::{MRN_PAD_WIDTH, MRN_PREFIX};
use openspace_types::PatientId;
use serde::Serialize;
use serde_json::{Map, Value};

/// One insurance policy attached to a patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsurancePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<String>,
}

/// Primary and secondary coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Insurance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<InsurancePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<InsurancePolicy>,
}

/// A patient as shown on the chart banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub id: PatientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// ISO `YYYY-MM-DD`, kept as received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn_last_four: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    pub allergies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attending_physician: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Insurance>,
}

impl PatientRecord {
    /// A record holding nothing but the identifier.
    pub fn bare(id: PatientId) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            date_of_birth: None,
            gender: None,
            mrn: None,
            ssn_last_four: None,
            blood_type: None,
            allergies: Vec::new(),
            room: None,
            attending_physician: None,
            insurance: None,
        }
    }

    /// Synthesises the demo record shown when the patient API cannot supply one.
    ///
    /// Deterministic for a given id and infallible.
    pub fn placeholder(id: PatientId) -> Self {
        let text = |s: &str| Some(s.to_string());

        Self {
            id,
            first_name: text("John"),
            last_name: text("Smith"),
            date_of_birth: text("1955-03-15"),
            gender: text("Male"),
            mrn: Some(placeholder_mrn(id)),
            ssn_last_four: text("1234"),
            blood_type: text("A+"),
            allergies: vec!["Penicillin".into(), "Sulfa".into()],
            room: text("412-A"),
            attending_physician: text("Dr. Sarah Wilson"),
            insurance: Some(Insurance {
                primary: Some(InsurancePolicy {
                    payer: text("Blue Cross Blue Shield"),
                    plan: text("PPO Gold"),
                    policy_number: text("BCB123456789"),
                    group_number: text("GRP001"),
                    copay: text("$25"),
                    subscriber: text("Self"),
                }),
                secondary: Some(InsurancePolicy {
                    payer: text("Medicare"),
                    policy_number: text("1EG4-TE5-MK72"),
                    ..InsurancePolicy::default()
                }),
            }),
        }
    }

    /// Builds a record from a patient API payload.
    ///
    /// Returns `None` unless `payload` is a JSON object with at least one member. Fields with an
    /// unexpected JSON type are dropped individually instead of rejecting the whole record, and a
    /// missing or invalid `id` is replaced by `requested`.
    pub fn from_payload(requested: PatientId, payload: &Value) -> Option<Self> {
        let obj = payload.as_object().filter(|o| !o.is_empty())?;

        let id = obj
            .get("id")
            .and_then(|v| serde_json::from_value::<PatientId>(v.clone()).ok())
            .unwrap_or(requested);

        Some(Self {
            id,
            first_name: text_field(obj, "first_name"),
            last_name: text_field(obj, "last_name"),
            date_of_birth: text_field(obj, "date_of_birth"),
            gender: text_field(obj, "gender"),
            mrn: text_field(obj, "mrn"),
            ssn_last_four: text_field(obj, "ssn_last_four"),
            blood_type: text_field(obj, "blood_type"),
            allergies: allergies_field(obj),
            room: text_field(obj, "room"),
            attending_physician: text_field(obj, "attending_physician"),
            insurance: obj.get("insurance").and_then(Value::as_object).map(|ins| {
                Insurance {
                    primary: policy_field(ins, "primary"),
                    secondary: policy_field(ins, "secondary"),
                }
            }),
        })
    }
}

/// `MRN` followed by the id left-padded with zeros to six digits. Longer ids are kept whole.
pub fn placeholder_mrn(id: PatientId) -> String {
    format!("{MRN_PREFIX}{:0>width$}", id.get(), width = MRN_PAD_WIDTH)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_text)
}

fn allergies_field(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("allergies") {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn policy_field(obj: &Map<String, Value>, key: &str) -> Option<InsurancePolicy> {
    let policy = obj.get(key)?.as_object().filter(|o| !o.is_empty())?;
    Some(InsurancePolicy {
        payer: text_field(policy, "payer"),
        plan: text_field(policy, "plan"),
        policy_number: text_field(policy, "policy_number"),
        group_number: text_field(policy, "group_number"),
        copay: text_field(policy, "copay"),
        subscriber: text_field(policy, "subscriber"),
    })
}
