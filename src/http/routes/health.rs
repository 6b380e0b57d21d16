//! Liveness probe.

use axum::Json;

use crate::http::dto::{ApiResponse, HealthData};

/// `GET /api/health`: unauthenticated liveness check.
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::new(HealthData {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
