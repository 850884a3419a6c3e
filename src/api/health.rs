use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: fails once shutdown has begun so load balancers drain traffic.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let shutting_down = *state.shutdown_rx.borrow();

    let (status_code, status) =
        if shutting_down { (StatusCode::SERVICE_UNAVAILABLE, "shutting_down") } else { (StatusCode::OK, "ok") };

    let response =
        HealthResponse { status: status.to_string(), registered_tokens: state.token_registry.len() };

    (status_code, Json(response))
}
