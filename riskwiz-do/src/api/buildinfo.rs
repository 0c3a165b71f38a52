//! Build information API endpoint
//!
//! Provides version and build metadata for display in UI

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Build information response
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub build_timestamp: String,
    pub build_profile: String,
}

/// GET /api/build_info
///
/// Returns build identification information for UI display
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
    })
}

/// Build info routes
pub fn buildinfo_routes() -> Router<AppState> {
    Router::new().route("/api/build_info", get(get_build_info))
}
