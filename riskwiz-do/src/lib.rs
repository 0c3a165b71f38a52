//! riskwiz-do library - Dashboard Orchestrator module
//!
//! Assembles the composite climate risk dashboard for the wizard UI:
//! fingerprints each request against the loaded dataset versions, serves
//! repeats from a time-bounded cache, dispatches acquisition to either the
//! simulated generators or the remote service, and only trusts payloads
//! that pass contract validation.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;

pub mod api;
pub mod cache;
pub mod dispatch;
pub mod drift;
pub mod error;
pub mod fingerprint;
pub mod orchestrator;
pub mod validate;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The orchestration core; one per process
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Create new application state
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::dashboard_routes())
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
