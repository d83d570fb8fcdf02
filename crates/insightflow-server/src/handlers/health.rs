//! Health check handler

use axum::Json;
use serde::Serialize;

use crate::SERVICE_NAME;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// GET / - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: format!("{} API is running", SERVICE_NAME),
    })
}
