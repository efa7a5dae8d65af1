//! Display defaulting for the patient banner.
//!
//! [`PatientDisplay::build`] is the single place where missing or malformed record fields are
//! turned into the literal placeholders the chart shows. The strings produced here are raw text;
//! escaping happens when they are written into the page.

use crate::constants::{
    BANNER_ALLERGY_LIMIT, DEFAULT_ATTENDING, DEFAULT_ROOM, DISPLAY_DATE_FORMAT, FALLBACK_AGE_DOB,
    NOT_AVAILABLE, SSN_MASK_PREFIX, SSN_MISSING_DIGITS, UNKNOWN,
};
use crate::patient::{InsurancePolicy, PatientRecord};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Insurance policy with every field resolved to display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDisplay {
    pub payer: String,
    pub plan: String,
    pub policy_number: String,
    pub group_number: String,
    pub copay: String,
    pub subscriber: String,
}

impl PolicyDisplay {
    fn from_policy(policy: &InsurancePolicy) -> Self {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self {
            payer: or_na(&policy.payer),
            plan: or_na(&policy.plan),
            policy_number: or_na(&policy.policy_number),
            group_number: or_na(&policy.group_number),
            copay: or_na(&policy.copay),
            subscriber: or_na(&policy.subscriber),
        }
    }
}

/// Banner insurance box: primary payer and plan as shown in the compact view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsuranceBox {
    pub payer: String,
    pub plan: String,
}

/// Every banner string derived from a [`PatientRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientDisplay {
    /// `"{last}, {first}"`
    pub name: String,
    pub age: u32,
    /// `"{age} y.o. {gender}"`
    pub age_sex: String,
    pub mrn: String,
    /// `MM/DD/YYYY`, empty when unknown.
    pub dob: String,
    pub ssn_masked: String,
    pub blood_type: String,
    /// `None` means no known allergies.
    pub allergy_badge: Option<String>,
    pub allergies: Vec<String>,
    pub room: String,
    pub attending: String,
    pub insurance_box: Option<InsuranceBox>,
    pub primary_policy: Option<PolicyDisplay>,
    pub secondary_policy: Option<PolicyDisplay>,
}

impl PatientDisplay {
    /// Resolves every display field of `record` as of `today`.
    ///
    /// Never fails: each field defaults on its own.
    pub fn build(record: &PatientRecord, today: NaiveDate) -> Self {
        let dob = record.date_of_birth.as_deref().and_then(parse_date);
        let age_dob = dob.or_else(|| parse_date(FALLBACK_AGE_DOB)).unwrap_or(today);
        let age = age_on(age_dob, today);

        let gender = record.gender.as_deref().unwrap_or(UNKNOWN);
        let primary = record.insurance.as_ref().and_then(|i| i.primary.as_ref());
        let secondary = record.insurance.as_ref().and_then(|i| i.secondary.as_ref());

        Self {
            name: display_name(record),
            age,
            age_sex: format!("{age} y.o. {gender}"),
            mrn: record.mrn.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            dob: dob
                .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            ssn_masked: format!(
                "{SSN_MASK_PREFIX}{}",
                record.ssn_last_four.as_deref().unwrap_or(SSN_MISSING_DIGITS)
            ),
            blood_type: record
                .blood_type
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            allergy_badge: allergy_badge(&record.allergies),
            allergies: record.allergies.clone(),
            room: record.room.clone().unwrap_or_else(|| DEFAULT_ROOM.to_string()),
            attending: record
                .attending_physician
                .clone()
                .unwrap_or_else(|| DEFAULT_ATTENDING.to_string()),
            insurance_box: primary.map(|p| InsuranceBox {
                payer: p.payer.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                plan: p.plan.clone().unwrap_or_default(),
            }),
            primary_policy: primary.map(PolicyDisplay::from_policy),
            secondary_policy: secondary.map(PolicyDisplay::from_policy),
        }
    }
}

/// `"{last}, {first}"` with `Unknown` for a missing last name and nothing for a missing first.
///
/// This is also the name stored in the open-patient ledger.
pub fn display_name(record: &PatientRecord) -> String {
    format!(
        "{}, {}",
        record.last_name.as_deref().unwrap_or(UNKNOWN),
        record.first_name.as_deref().unwrap_or("")
    )
}

/// Whole calendar years from `dob` to `today`.
///
/// The year count only advances on the birthday itself. A birth date in the future yields 0.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    if dob >= today {
        return 0;
    }

    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component (`T...` or ` ...`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = match raw.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &raw[..idx],
        _ => raw,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// First two allergies joined by `, `, with `+N` for the rest; `None` when there are none.
pub fn allergy_badge(allergies: &[String]) -> Option<String> {
    if allergies.is_empty() {
        return None;
    }

    if allergies.len() > BANNER_ALLERGY_LIMIT {
        Some(format!(
            "{} +{}",
            allergies[..BANNER_ALLERGY_LIMIT].join(", "),
            allergies.len() - BANNER_ALLERGY_LIMIT
        ))
    } else {
        Some(allergies.join(", "))
    }
}
