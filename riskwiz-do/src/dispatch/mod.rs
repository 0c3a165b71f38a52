//! Acquisition dispatch
//!
//! Produces a raw, unvalidated dashboard payload. Two interchangeable
//! strategies, selected once per process from configuration: simulated
//! sub-generators ([`mock`]) or a single remote service call ([`remote`]).
//! The dispatcher never validates what it produces and never retries; both
//! are the caller's decisions.

use riskwiz_common::config::{AcquisitionMode, ServiceConfig};
use riskwiz_common::types::WizardInputs;
use riskwiz_common::versions::DatasetVersionRegistry;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub mod mock;
pub mod remote;

pub use mock::MockGenerator;
pub use remote::RemoteClient;

/// Dispatch errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A simulated sub-generator failed; the whole dispatch fails with it
    #[error("Sub-generator '{generator}' failed: {detail}")]
    Generator {
        generator: &'static str,
        detail: String,
    },

    /// Remote service answered with a non-success status
    #[error("Remote dispatch failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// Remote call did not complete
    #[error("Network error: {0}")]
    Network(String),

    /// Remote call exceeded the configured deadline
    #[error("Remote dispatch timed out after {0} ms")]
    Timeout(u64),
}

/// The per-process acquisition strategy
pub enum AcquisitionStrategy {
    Mock(MockGenerator),
    Real(RemoteClient),
}

impl AcquisitionStrategy {
    /// Build the strategy the configuration asks for
    pub fn from_config(
        config: &ServiceConfig,
        registry: &DatasetVersionRegistry,
    ) -> riskwiz_common::Result<Self> {
        match config.mode {
            AcquisitionMode::Mock => Ok(Self::Mock(MockGenerator::new(registry.entries()))),
            AcquisitionMode::Real => Ok(Self::Real(RemoteClient::new(
                &config.remote_base,
                Duration::from_millis(config.request_timeout_ms),
            )?)),
        }
    }

    pub fn mode(&self) -> AcquisitionMode {
        match self {
            Self::Mock(_) => AcquisitionMode::Mock,
            Self::Real(_) => AcquisitionMode::Real,
        }
    }

    /// Produce a raw dashboard payload for the inputs
    ///
    /// The fingerprint rides along as the correlation identifier; in real
    /// mode it becomes the `X-Request-ID` header.
    pub async fn acquire(
        &self,
        inputs: &WizardInputs,
        fingerprint: &str,
    ) -> Result<Value, DispatchError> {
        match self {
            Self::Mock(generator) => generator.generate(inputs).await,
            Self::Real(client) => client.fetch_dashboard(inputs, fingerprint).await,
        }
    }
}
