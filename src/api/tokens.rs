use crate::api::AppState;
use crate::api::schemas::push_tokens::{ApiResponse, RegisterTokenRequest};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
};
use std::collections::BTreeSet;

/// Registers a device token. Registering a known token is not an error.
///
/// # Errors
/// Returns `AppError::BadRequest` if the token is empty or too long.
pub async fn register_token(
    State(state): State<AppState>,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<Json<ApiResponse>> {
    payload.validate().map_err(AppError::BadRequest)?;

    if !state.token_registry.add(&payload.token) {
        tracing::debug!("Token was already registered");
    }
    tracing::info!(count = state.token_registry.len(), "Registered device token");
    Ok(Json(ApiResponse::ok("Token registered successfully")))
}

pub async fn list_tokens(State(state): State<AppState>) -> Json<BTreeSet<String>> {
    Json(state.token_registry.list_all())
}

/// Removes a registered device token.
///
/// # Errors
/// Returns `AppError::NotFound` if the token is not registered.
pub async fn remove_token(State(state): State<AppState>, Path(token): Path<String>) -> Result<Json<ApiResponse>> {
    state.token_registry.remove(&token)?;
    tracing::info!(count = state.token_registry.len(), "Removed device token");
    Ok(Json(ApiResponse::ok("Token removed successfully")))
}
