//! Patient resolution with placeholder fallback.

use crate::lookup::PatientLookup;
use crate::patient::PatientRecord;
use openspace_types::PatientId;

/// Resolves the record to show for `id`.
///
/// Uses the lookup's payload when the call succeeds and returns a non-empty object; otherwise
/// (error, `success: false`, missing or empty data) returns [`PatientRecord::placeholder`].
/// Never fails.
pub async fn resolve_patient<L: PatientLookup>(lookup: &L, id: PatientId) -> PatientRecord {
    match lookup.get_by_id(id).await {
        Ok(response) if response.success => {
            match response
                .data
                .as_ref()
                .and_then(|data| PatientRecord::from_payload(id, data))
            {
                Some(record) => record,
                None => {
                    tracing::debug!(patient_id = %id, "patient API returned no data, using placeholder");
                    PatientRecord::placeholder(id)
                }
            }
        }
        Ok(_) => {
            tracing::debug!(patient_id = %id, "patient API reported failure, using placeholder");
            PatientRecord::placeholder(id)
        }
        Err(e) => {
            tracing::warn!(patient_id = %id, "patient lookup failed, using placeholder: {}", e);
            PatientRecord::placeholder(id)
        }
    }
}
