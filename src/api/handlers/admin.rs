use axum::Json;
use serde::Serialize;

use crate::api::response::DataEnvelope;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<DataEnvelope<HealthResponse>> {
    DataEnvelope::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
