use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::auth;
use crate::AppState;

/// Bearer-token guard for the task routes.
///
/// A missing Authorization header yields 401 `{"error":"missing token"}`; a
/// header whose token fails verification yields 401 `{"error":"invalid
/// token"}` -- the exact body the client keys its session-reset logic on.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(header_value) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return ApiError::unauthorized("missing token").into_response();
    };

    let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

    match auth::verify_token(&state.config.auth.jwt_secret, token) {
        Ok(_claims) => next.run(req).await,
        Err(_) => ApiError::unauthorized("invalid token").into_response(),
    }
}
