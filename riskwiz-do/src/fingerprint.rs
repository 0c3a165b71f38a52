//! Request fingerprint generation
//!
//! Derives a stable identifier from normalized wizard inputs and the
//! current dataset version digest. The fingerprint is both the cache key
//! and the end-to-end correlation identifier: one orchestration call uses
//! one fingerprint everywhere it is observable.

use riskwiz_common::types::WizardInputs;

/// Fixed namespace tag leading every fingerprint
const NAMESPACE: &str = "riskwiz.dashboard.v1";

/// Field delimiter. Must stay inside the set of bytes a HTTP header value
/// accepts: the fingerprint rides on the wire as `X-Request-ID`.
const FIELD_SEP: &str = "|";

/// Hazards are comma-joined after sorting; selection order never changes
/// identity.
const HAZARD_SEP: &str = ",";

/// Compute the fingerprint for a wizard input snapshot
///
/// Pure function of its arguments: no I/O, no clock, no randomness.
/// Presence of the required fields is the caller's responsibility; an
/// empty field still fingerprints deterministically.
pub fn request_fingerprint(inputs: &WizardInputs, dataset_hash: &str) -> String {
    [
        NAMESPACE.to_string(),
        escape(&inputs.location_key),
        inputs.precision_level.as_str().to_string(),
        inputs
            .sorted_hazards()
            .iter()
            .map(|hazard| escape(hazard))
            .collect::<Vec<_>>()
            .join(HAZARD_SEP),
        escape(&inputs.selected_system),
        dataset_hash.to_string(),
    ]
    .join(FIELD_SEP)
}

/// Escape the delimiters so no field value can fake a field or hazard
/// boundary
fn escape(field: &str) -> String {
    field
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(',', "\\,")
}
