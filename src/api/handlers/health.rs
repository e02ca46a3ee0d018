//! Health check endpoint

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Service health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` while the service is running
    pub status: String,
    /// Service version (from Cargo.toml)
    pub version: String,
}

/// Liveness probe
///
/// Returns the current status and version. No authentication required.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
