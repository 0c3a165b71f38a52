//! Dashboard orchestration entry point
//!
//! Composes the registry, fingerprint, cache, dispatcher, and validator
//! into the single call the HTTP surface exposes: validate inputs →
//! compute fingerprint → check cache → on miss, dispatch → validate →
//! cache → return. Every log event on the way carries the fingerprint, so
//! one call is correlatable end to end, including the remote hop.

use crate::cache::ResultCache;
use crate::dispatch::{AcquisitionStrategy, DispatchError};
use crate::fingerprint::request_fingerprint;
use crate::validate::{validate_dashboard, FieldError};
use riskwiz_common::types::{DashboardResult, WizardInputs};
use riskwiz_common::versions::DatasetVersionRegistry;
use thiserror::Error;
use tracing::{error, info};

/// Orchestration failure taxonomy
///
/// All variants are terminal for the call; retry, if any, means the caller
/// re-invokes the whole orchestration.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    /// Required wizard field missing; nothing was fingerprinted or
    /// dispatched
    #[error("Missing required inputs: {0}")]
    Input(String),

    /// Dispatch failed; detail propagated verbatim
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Dispatch succeeded but the payload violated the contract
    #[error("Dashboard contract violated: {}", format_violations(.0))]
    Contract(Vec<FieldError>),
}

fn format_violations(violations: &[FieldError]) -> String {
    violations
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The orchestration core
///
/// Holds explicitly injected collaborators; constructed once at startup
/// and shared behind an `Arc`.
pub struct Orchestrator {
    registry: DatasetVersionRegistry,
    cache: ResultCache,
    strategy: AcquisitionStrategy,
}

impl Orchestrator {
    pub fn new(
        registry: DatasetVersionRegistry,
        cache: ResultCache,
        strategy: AcquisitionStrategy,
    ) -> Self {
        Self {
            registry,
            cache,
            strategy,
        }
    }

    /// Fingerprint the given inputs against the current dataset versions
    ///
    /// Exposed so the drift machine can compare live inputs against the
    /// key of a displayed result.
    pub fn fingerprint_for(&self, inputs: &WizardInputs) -> String {
        request_fingerprint(inputs, self.registry.hash())
    }

    /// Run one orchestration call to completion
    pub async fn run(&self, inputs: &WizardInputs) -> Result<DashboardResult, OrchestrateError> {
        let missing = inputs.missing_fields();
        if !missing.is_empty() {
            return Err(OrchestrateError::Input(missing.join(", ")));
        }

        let fingerprint = self.fingerprint_for(inputs);
        info!(
            fingerprint = %fingerprint,
            location = %inputs.location_key,
            hazards = inputs.selected_hazards.len(),
            system = %inputs.selected_system,
            mode = self.strategy.mode().as_str(),
            "Dashboard orchestration requested"
        );

        if let Some(cached) = self.cache.get(&fingerprint).await {
            // Validation happened at write time; a hit returns unchanged
            info!(fingerprint = %fingerprint, "Cache hit; returning stored dashboard");
            return Ok(cached);
        }

        let raw = match self.strategy.acquire(inputs, &fingerprint).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(
                    fingerprint = %fingerprint,
                    location = %inputs.location_key,
                    error = %e,
                    "Dashboard dispatch failed"
                );
                return Err(e.into());
            }
        };

        let dashboard = match validate_dashboard(&raw) {
            Ok(dashboard) => dashboard,
            Err(violations) => {
                error!(
                    fingerprint = %fingerprint,
                    violations = violations.len(),
                    detail = %format_violations(&violations),
                    "Dispatched payload failed contract validation"
                );
                return Err(OrchestrateError::Contract(violations));
            }
        };

        self.cache.set(&fingerprint, dashboard.clone()).await;

        info!(
            fingerprint = %fingerprint,
            as_of = %dashboard.metadata.as_of,
            versions = dashboard.metadata.dataset_versions.len(),
            nodes = dashboard.risk_chain.nodes.len(),
            "Dashboard orchestration complete"
        );
        Ok(dashboard)
    }
}
