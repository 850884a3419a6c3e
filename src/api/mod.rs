use crate::api::middleware::{MakeRequestUuidOrHeader, REQUEST_ID_HEADER};
use crate::services::notification::Dispatcher;
use crate::services::token_registry::TokenRegistry;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::request_id::{PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod health;
pub mod middleware;
pub mod notifications;
pub mod schemas;
pub mod tokens;

#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub token_registry: TokenRegistry,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub token_registry: TokenRegistry,
    pub shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

/// Configures and returns the primary application router.
pub fn app_router(state: AppState) -> Router {
    let notification_routes = Router::new()
        .route("/send", post(notifications::send))
        .route("/send-to-topic", post(notifications::send_to_topic))
        .route("/send-to-device", post(notifications::send_to_device))
        .route("/register-token", post(tokens::register_token))
        .route("/tokens", get(tokens::list_tokens))
        .route("/tokens/{token}", delete(tokens::remove_token));

    Router::new()
        .nest("/api/notifications", notification_routes)
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestId>()
                        .and_then(|id| id.header_value().to_str().ok())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        let status = response.status();
                        span.record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeRequestUuidOrHeader))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
