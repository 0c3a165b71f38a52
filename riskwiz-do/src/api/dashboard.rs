//! Dashboard orchestration endpoint
//!
//! The single surface the wizard UI calls: it accepts the collected
//! inputs, runs one orchestration call to completion, and returns the
//! validated dashboard. No partial result is ever exposed.

use axum::{extract::State, routing::post, Json, Router};
use riskwiz_common::types::{DashboardResult, WizardInputs};

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/wizard/dashboard
///
/// Request body: `{location_key, selected_hazards, selected_system,
/// precision_level?}`. Missing required fields come back as 400 with the
/// offending field names; dispatch and contract failures as 500. Non-POST
/// methods are rejected with 405 by the router.
pub async fn compute_dashboard(
    State(state): State<AppState>,
    Json(inputs): Json<WizardInputs>,
) -> ApiResult<Json<DashboardResult>> {
    let dashboard = state.orchestrator.run(&inputs).await?;
    Ok(Json(dashboard))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/wizard/dashboard", post(compute_dashboard))
}
