//! Shared wizard and dashboard types
//!
//! Types exchanged between the wizard UI layer and the dashboard
//! orchestrator, and returned over the remote dispatch wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature unit carried by every baseline estimate.
pub const TEMPERATURE_UNIT: &str = "°C";

// ========================================
// Wizard Input Types
// ========================================

/// Requested precision for the baseline estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionLevel {
    /// Exact coordinates were resolved for the location
    Exact,
    /// Region-level approximation (default when the user skips the choice)
    #[default]
    Approximate,
}

impl PrecisionLevel {
    /// Lowercase token used in fingerprints and wire payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecisionLevel::Exact => "exact",
            PrecisionLevel::Approximate => "approximate",
        }
    }
}

/// Wizard step sequence
///
/// Ordering is significant: a step compares greater than every step that
/// precedes it, which is how the drift machine decides whether the user is
/// past the input-collection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    /// Resolve a place into a location key
    Location,
    /// Pick one or more hazard tags
    Hazards,
    /// Pick the system of concern
    System,
    /// Rendered dashboard
    Dashboard,
}

/// User selections collected by the wizard
///
/// All fields default so a partially filled request body still
/// deserializes; required-field enforcement happens in the orchestrator,
/// not in serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardInputs {
    /// Opaque identifier of the resolved place (non-empty once set)
    #[serde(default)]
    pub location_key: String,

    /// Selected hazard tags; order carries no meaning
    #[serde(default)]
    pub selected_hazards: Vec<String>,

    /// Single tag identifying the system of concern
    #[serde(default)]
    pub selected_system: String,

    /// Requested precision, defaulting to approximate
    #[serde(default)]
    pub precision_level: PrecisionLevel,
}

impl WizardInputs {
    /// Names of required fields that are still missing, in wizard order.
    ///
    /// Empty means the inputs are submittable.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.location_key.trim().is_empty() {
            missing.push("location_key");
        }
        if self.selected_hazards.is_empty() {
            missing.push("selected_hazards");
        }
        if self.selected_system.trim().is_empty() {
            missing.push("selected_system");
        }
        missing
    }

    /// Hazards sorted lexicographically; selection order never affects
    /// request identity.
    pub fn sorted_hazards(&self) -> Vec<String> {
        let mut hazards = self.selected_hazards.clone();
        hazards.sort();
        hazards
    }
}

// ========================================
// Dashboard Result Types
// ========================================

/// Confidence descriptor attached to the baseline estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Role a node plays in the risk chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskNodeKind {
    /// A selected climate hazard
    Hazard,
    /// A transmission pathway between hazard and system
    Pathway,
    /// An impact on the system of concern
    Outcome,
}

/// Direction a node's severity is trending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftDirection {
    Rising,
    Stable,
    Falling,
}

/// Magnitude of the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftMagnitude {
    Minor,
    Moderate,
    Major,
}

/// Resolved place plus its regional profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// The location key the request was made with
    pub key: String,
    /// Human-readable place name
    pub name: String,
    /// Short regional exposure profile
    pub region_profile: String,
}

/// Scalar warming estimate for the location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEstimate {
    /// Estimated warming, degrees; contract range [0, 10]
    pub value: f64,
    /// Always [`TEMPERATURE_UNIT`]
    pub unit: String,
    pub confidence: ConfidenceLevel,
}

/// Severity trend attached to a risk node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDrift {
    pub direction: DriftDirection,
    pub magnitude: DriftMagnitude,
}

/// One node in the ordered risk chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskNode {
    /// Stable node identifier (non-empty)
    pub id: String,
    /// Display label (non-empty)
    pub label: String,
    pub kind: RiskNodeKind,
    /// Severity score, contract range [0, 1]
    pub severity: f64,
    pub drift: NodeDrift,
}

/// Cross-system spillover summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpilloverSummary {
    /// Spillover score, contract range [0, 1]
    pub score: f64,
    /// Free-text summary of spillover exposure
    pub summary: String,
}

/// Ordered risk nodes plus the spillover summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskChain {
    /// Non-empty, ordered hazard-to-outcome sequence
    pub nodes: Vec<RiskNode>,
    pub spillover: SpilloverSummary,
}

/// One upstream dataset and the version it was read at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVersion {
    pub source: String,
    pub version: String,
}

/// Provenance attached to every dashboard result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// When the result was assembled
    pub as_of: DateTime<Utc>,
    /// Dataset versions actually used (non-empty)
    pub dataset_versions: Vec<DatasetVersion>,
    /// Free-text provenance note
    pub provenance: String,
}

/// The validated composite dashboard
///
/// Produced once per orchestration call and immutable afterwards; the
/// rendering layer only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResult {
    pub location: ResolvedLocation,
    pub baseline: BaselineEstimate,
    pub risk_chain: RiskChain,
    pub metadata: ResultMetadata,
}

// ========================================
// Error Response Types
// ========================================

/// Flat error body returned by the local HTTP surface and expected from
/// the remote service on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable code
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_request_body_deserializes_with_defaults() {
        let inputs: WizardInputs = serde_json::from_str(r#"{"location_key":"geo_1"}"#).unwrap();
        assert_eq!(inputs.location_key, "geo_1");
        assert!(inputs.selected_hazards.is_empty());
        assert_eq!(inputs.precision_level, PrecisionLevel::Approximate);
    }

    #[test]
    fn missing_fields_reported_in_wizard_order() {
        let inputs = WizardInputs {
            location_key: String::new(),
            selected_hazards: vec![],
            selected_system: String::new(),
            precision_level: PrecisionLevel::Approximate,
        };
        assert_eq!(
            inputs.missing_fields(),
            vec!["location_key", "selected_hazards", "selected_system"]
        );

        let filled = WizardInputs {
            location_key: "geo_1".into(),
            selected_hazards: vec!["Heat".into()],
            selected_system: "Health".into(),
            precision_level: PrecisionLevel::Exact,
        };
        assert!(filled.missing_fields().is_empty());
    }

    #[test]
    fn sorted_hazards_ignores_selection_order() {
        let a = WizardInputs {
            location_key: "geo_1".into(),
            selected_hazards: vec!["Flood".into(), "Heat".into()],
            selected_system: "Health".into(),
            precision_level: PrecisionLevel::Approximate,
        };
        let b = WizardInputs {
            selected_hazards: vec!["Heat".into(), "Flood".into()],
            ..a.clone()
        };
        assert_eq!(a.sorted_hazards(), b.sorted_hazards());
    }

    #[test]
    fn wizard_steps_are_ordered() {
        assert!(WizardStep::Dashboard > WizardStep::System);
        assert!(WizardStep::System > WizardStep::Hazards);
        assert!(WizardStep::Hazards > WizardStep::Location);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&DriftDirection::Rising).unwrap(),
            "\"rising\""
        );
        assert_eq!(
            serde_json::to_string(&ConfidenceLevel::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(
            serde_json::to_string(&RiskNodeKind::Pathway).unwrap(),
            "\"pathway\""
        );
        assert_eq!(
            serde_json::to_string(&DriftMagnitude::Major).unwrap(),
            "\"major\""
        );
    }
}
