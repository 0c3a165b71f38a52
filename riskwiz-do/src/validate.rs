//! Dashboard contract validation
//!
//! Checks a raw dispatch payload against the dashboard contract before it
//! is trusted or cached: section presence, enumerated-value membership,
//! numeric ranges, non-emptiness, and the temperature unit literal. The
//! outcome is always structured, either a typed [`DashboardResult`] or an
//! ordered list of field-level violations, and this module never panics
//! on any input shape.

use riskwiz_common::types::{DashboardResult, TEMPERATURE_UNIT};
use serde_json::Value;
use std::fmt;
use tracing::debug;

const SECTIONS: [&str; 4] = ["location", "baseline", "risk_chain", "metadata"];
const CONFIDENCE_LEVELS: [&str; 3] = ["low", "medium", "high"];
const NODE_KINDS: [&str; 3] = ["hazard", "pathway", "outcome"];
const DRIFT_DIRECTIONS: [&str; 3] = ["rising", "stable", "falling"];
const DRIFT_MAGNITUDES: [&str; 3] = ["minor", "moderate", "major"];

/// One violated contract rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `risk_chain.spillover.score`
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a raw dispatch payload against the dashboard contract
///
/// Returns the typed result when every rule holds, otherwise the full
/// ordered list of violations (one entry per violated rule, in document
/// order). Pure apart from a debug log on failure.
pub fn validate_dashboard(raw: &Value) -> Result<DashboardResult, Vec<FieldError>> {
    let mut errors = Vec::new();

    let Some(root) = raw.as_object() else {
        return Err(vec![FieldError::new("$", "payload must be a JSON object")]);
    };

    for section in SECTIONS {
        if !root.contains_key(section) {
            errors.push(FieldError::new(section, "missing section"));
        }
    }

    if let Some(location) = root.get("location") {
        require_nonempty_string(location.get("key"), "location.key", &mut errors);
        require_nonempty_string(location.get("name"), "location.name", &mut errors);
        require_nonempty_string(
            location.get("region_profile"),
            "location.region_profile",
            &mut errors,
        );
    }

    if let Some(baseline) = root.get("baseline") {
        require_number_in_range(baseline.get("value"), "baseline.value", 0.0, 10.0, &mut errors);
        match baseline.get("unit").and_then(Value::as_str) {
            Some(unit) if unit == TEMPERATURE_UNIT => {}
            Some(unit) => errors.push(FieldError::new(
                "baseline.unit",
                format!("must be '{TEMPERATURE_UNIT}', got '{unit}'"),
            )),
            None => errors.push(FieldError::new("baseline.unit", "must be a string")),
        }
        require_enum(
            baseline.get("confidence"),
            "baseline.confidence",
            &CONFIDENCE_LEVELS,
            &mut errors,
        );
    }

    if let Some(risk_chain) = root.get("risk_chain") {
        match risk_chain.get("nodes").and_then(Value::as_array) {
            Some(nodes) if nodes.is_empty() => {
                errors.push(FieldError::new("risk_chain.nodes", "must not be empty"));
            }
            Some(nodes) => {
                for (index, node) in nodes.iter().enumerate() {
                    validate_node(node, index, &mut errors);
                }
            }
            None => errors.push(FieldError::new("risk_chain.nodes", "must be an array")),
        }

        match risk_chain.get("spillover") {
            Some(spillover) => {
                require_number_in_range(
                    spillover.get("score"),
                    "risk_chain.spillover.score",
                    0.0,
                    1.0,
                    &mut errors,
                );
                require_nonempty_string(
                    spillover.get("summary"),
                    "risk_chain.spillover.summary",
                    &mut errors,
                );
            }
            None => errors.push(FieldError::new("risk_chain.spillover", "missing section")),
        }
    }

    if let Some(metadata) = root.get("metadata") {
        match metadata.get("as_of").and_then(Value::as_str) {
            Some(as_of) if chrono::DateTime::parse_from_rfc3339(as_of).is_ok() => {}
            Some(as_of) => errors.push(FieldError::new(
                "metadata.as_of",
                format!("must be an RFC 3339 timestamp, got '{as_of}'"),
            )),
            None => errors.push(FieldError::new("metadata.as_of", "must be a string")),
        }

        match metadata.get("dataset_versions").and_then(Value::as_array) {
            Some(versions) if versions.is_empty() => {
                errors.push(FieldError::new("metadata.dataset_versions", "must not be empty"));
            }
            Some(versions) => {
                for (index, entry) in versions.iter().enumerate() {
                    let prefix = format!("metadata.dataset_versions[{index}]");
                    require_nonempty_string(
                        entry.get("source"),
                        &format!("{prefix}.source"),
                        &mut errors,
                    );
                    require_nonempty_string(
                        entry.get("version"),
                        &format!("{prefix}.version"),
                        &mut errors,
                    );
                }
            }
            None => errors.push(FieldError::new("metadata.dataset_versions", "must be an array")),
        }

        if metadata.get("provenance").and_then(Value::as_str).is_none() {
            errors.push(FieldError::new("metadata.provenance", "must be a string"));
        }
    }

    if !errors.is_empty() {
        debug!(violations = errors.len(), "Dashboard payload failed contract validation");
        return Err(errors);
    }

    // The structural walk above covers every field the type needs, so this
    // decode is expected to succeed; a failure here still surfaces as a
    // structured violation rather than a panic.
    serde_json::from_value::<DashboardResult>(raw.clone())
        .map_err(|e| vec![FieldError::new("$", format!("failed to decode payload: {e}"))])
}

fn validate_node(node: &Value, index: usize, errors: &mut Vec<FieldError>) {
    let prefix = format!("risk_chain.nodes[{index}]");
    require_nonempty_string(node.get("id"), &format!("{prefix}.id"), errors);
    require_nonempty_string(node.get("label"), &format!("{prefix}.label"), errors);
    require_enum(node.get("kind"), &format!("{prefix}.kind"), &NODE_KINDS, errors);
    require_number_in_range(node.get("severity"), &format!("{prefix}.severity"), 0.0, 1.0, errors);

    match node.get("drift") {
        Some(drift) => {
            require_enum(
                drift.get("direction"),
                &format!("{prefix}.drift.direction"),
                &DRIFT_DIRECTIONS,
                errors,
            );
            require_enum(
                drift.get("magnitude"),
                &format!("{prefix}.drift.magnitude"),
                &DRIFT_MAGNITUDES,
                errors,
            );
        }
        None => errors.push(FieldError::new(format!("{prefix}.drift"), "missing section")),
    }
}

fn require_nonempty_string(value: Option<&Value>, path: &str, errors: &mut Vec<FieldError>) {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        Some(_) => errors.push(FieldError::new(path, "must not be empty")),
        None => errors.push(FieldError::new(path, "must be a non-empty string")),
    }
}

fn require_number_in_range(
    value: Option<&Value>,
    path: &str,
    low: f64,
    high: f64,
    errors: &mut Vec<FieldError>,
) {
    match value.and_then(Value::as_f64) {
        Some(n) if (low..=high).contains(&n) => {}
        Some(n) => errors.push(FieldError::new(
            path,
            format!("must be within [{low}, {high}], got {n}"),
        )),
        None => errors.push(FieldError::new(path, "must be a number")),
    }
}

fn require_enum(value: Option<&Value>, path: &str, allowed: &[&str], errors: &mut Vec<FieldError>) {
    match value.and_then(Value::as_str) {
        Some(s) if allowed.contains(&s) => {}
        Some(s) => errors.push(FieldError::new(
            path,
            format!("must be one of {allowed:?}, got '{s}'"),
        )),
        None => errors.push(FieldError::new(path, "must be a string")),
    }
}
