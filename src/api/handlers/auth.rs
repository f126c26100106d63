use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, DataEnvelope};
use crate::auth;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expiration_time: i64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<DataEnvelope<AuthResponse>>, ApiError> {
    if req.username.is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }

    let auth_config = &state.config.auth;
    if req.username != auth_config.username || req.password != auth_config.password {
        return Err(ApiError::unauthorized("invalid username or password"));
    }

    let issued = auth::issue_token(
        &auth_config.jwt_secret,
        &req.username,
        auth_config.token_ttl_secs,
    )
    .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(username = %req.username, "Issued session token");

    Ok(DataEnvelope::success(AuthResponse {
        token: issued.token,
        expiration_time: issued.expiration_time,
    }))
}
