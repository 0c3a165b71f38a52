//! Simulated acquisition strategy
//!
//! Three independent sub-generators (location resolution, baseline
//! warming estimate, risk-chain construction) run concurrently and the
//! dispatch waits for all three (fan-out/fan-in join). Content is a pure
//! function of the inputs; only the artificial latency varies between
//! calls. Failure of any sub-generator fails the whole dispatch with no
//! partial result.

use super::DispatchError;
use chrono::Utc;
use rand::Rng;
use riskwiz_common::types::{
    BaselineEstimate, ConfidenceLevel, DashboardResult, DatasetVersion, DriftDirection,
    DriftMagnitude, NodeDrift, PrecisionLevel, ResolvedLocation, ResultMetadata, RiskChain,
    RiskNode, RiskNodeKind, SpilloverSummary, WizardInputs, TEMPERATURE_UNIT,
};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Simulation limit on chain assembly; the wizard offers far fewer tags
const MAX_CHAIN_HAZARDS: usize = 16;

/// Regional exposure profiles, picked deterministically per location
const REGION_PROFILES: [&str; 4] = [
    "coastal lowland with concentrated flood exposure",
    "semi-arid interior under recurring heat stress",
    "river basin with seasonal inundation and drought swings",
    "upland corridor exposed to wildfire and storm damage",
];

/// Simulated sub-service generator set
pub struct MockGenerator {
    dataset_versions: Vec<DatasetVersion>,
    calls: AtomicU64,
}

impl MockGenerator {
    pub fn new(dataset_versions: Vec<DatasetVersion>) -> Self {
        Self {
            dataset_versions,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of dispatches this generator has served
    pub fn dispatch_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Run all three sub-generators concurrently and assemble the raw
    /// dashboard payload
    pub async fn generate(&self, inputs: &WizardInputs) -> Result<Value, DispatchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let (location, baseline, risk_chain) = tokio::join!(
            resolve_location(inputs),
            estimate_baseline(inputs),
            build_risk_chain(inputs),
        );

        let result = DashboardResult {
            location: location?,
            baseline: baseline?,
            risk_chain: risk_chain?,
            metadata: ResultMetadata {
                as_of: Utc::now(),
                dataset_versions: self.dataset_versions.clone(),
                provenance: "simulated acquisition (mock mode)".to_string(),
            },
        };

        debug!(
            location = %result.location.key,
            nodes = result.risk_chain.nodes.len(),
            "Mock dispatch assembled"
        );

        serde_json::to_value(result).map_err(|e| DispatchError::Generator {
            generator: "assembler",
            detail: e.to_string(),
        })
    }
}

/// Resolve the location key into a place name and regional profile
async fn resolve_location(inputs: &WizardInputs) -> Result<ResolvedLocation, DispatchError> {
    simulate_latency().await;

    let profile_index = (mix(&inputs.location_key) % REGION_PROFILES.len() as u64) as usize;
    Ok(ResolvedLocation {
        key: inputs.location_key.clone(),
        name: prettify(&inputs.location_key),
        region_profile: REGION_PROFILES[profile_index].to_string(),
    })
}

/// Estimate baseline warming for the location
async fn estimate_baseline(inputs: &WizardInputs) -> Result<BaselineEstimate, DispatchError> {
    simulate_latency().await;

    let seed = format!("{}:{}", inputs.location_key, inputs.precision_level.as_str());
    // Plausible near-term warming band, well inside the [0, 10] contract
    let value = round2(0.6 + fraction(&seed) * 3.6);

    let confidence = match inputs.precision_level {
        PrecisionLevel::Exact => ConfidenceLevel::High,
        PrecisionLevel::Approximate => {
            if fraction(&inputs.location_key) > 0.5 {
                ConfidenceLevel::Medium
            } else {
                ConfidenceLevel::Low
            }
        }
    };

    Ok(BaselineEstimate {
        value,
        unit: TEMPERATURE_UNIT.to_string(),
        confidence,
    })
}

/// Build the hazard-to-outcome risk chain with a spillover summary
async fn build_risk_chain(inputs: &WizardInputs) -> Result<RiskChain, DispatchError> {
    simulate_latency().await;

    let hazards = inputs.sorted_hazards();
    if hazards.len() > MAX_CHAIN_HAZARDS {
        return Err(DispatchError::Generator {
            generator: "risk_chain",
            detail: format!(
                "chain assembly supports at most {MAX_CHAIN_HAZARDS} hazards, got {}",
                hazards.len()
            ),
        });
    }

    let mut nodes = Vec::with_capacity(hazards.len() + 2);
    for hazard in &hazards {
        let seed = format!("{}:{}", inputs.location_key, hazard);
        nodes.push(RiskNode {
            id: format!("hz-{}", slug(hazard)),
            label: hazard.clone(),
            kind: RiskNodeKind::Hazard,
            severity: round2(fraction(&seed)),
            drift: drift_for(&seed),
        });
    }

    let pathway_seed = format!("{}>{}", inputs.location_key, inputs.selected_system);
    nodes.push(RiskNode {
        id: format!("pw-{}", slug(&inputs.selected_system)),
        label: format!("{} exposure pathway", inputs.selected_system),
        kind: RiskNodeKind::Pathway,
        severity: round2(fraction(&pathway_seed)),
        drift: drift_for(&pathway_seed),
    });

    let outcome_seed = format!("{}!{}", inputs.location_key, inputs.selected_system);
    nodes.push(RiskNode {
        id: format!("oc-{}", slug(&inputs.selected_system)),
        label: format!("Pressure on {}", inputs.selected_system),
        kind: RiskNodeKind::Outcome,
        severity: round2(fraction(&outcome_seed)),
        drift: drift_for(&outcome_seed),
    });

    let spillover_seed = format!("{}~{}", inputs.location_key, inputs.selected_system);
    Ok(RiskChain {
        nodes,
        spillover: SpilloverSummary {
            score: round2(fraction(&spillover_seed)),
            summary: format!(
                "Stress on {} propagates into neighboring systems through shared infrastructure",
                inputs.selected_system
            ),
        },
    })
}

/// Artificial sub-service latency; the only nondeterminism in mock mode
async fn simulate_latency() {
    let delay_ms = rand::thread_rng().gen_range(10..40);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

/// FNV-1a; a cheap stable seed, not a security boundary
fn mix(seed: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in seed.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Deterministic value in [0, 1)
fn fraction(seed: &str) -> f64 {
    (mix(seed) % 10_000) as f64 / 10_000.0
}

fn drift_for(seed: &str) -> NodeDrift {
    let hash = mix(seed);
    let direction = match hash % 3 {
        0 => DriftDirection::Rising,
        1 => DriftDirection::Stable,
        _ => DriftDirection::Falling,
    };
    let magnitude = match (hash / 3) % 3 {
        0 => DriftMagnitude::Minor,
        1 => DriftMagnitude::Moderate,
        _ => DriftMagnitude::Major,
    };
    NodeDrift {
        direction,
        magnitude,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// "geo_1" -> "Geo 1"
fn prettify(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn slug(tag: &str) -> String {
    tag.to_lowercase().replace([' ', '_'], "-")
}
