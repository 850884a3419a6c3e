use crate::domain::notification::IntentError;
use crate::services::notification::{DispatchError, FailureKind};
use crate::services::token_registry::RegistryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<IntentError> for AppError {
    fn from(e: IntentError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(_) => Self::NotFound(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, "bad_request", msg)
            }
            Self::NotFound(msg) => {
                tracing::debug!(message = %msg, "Resource not found");
                (StatusCode::NOT_FOUND, "not_found", msg)
            }
            Self::Dispatch(e) => {
                let status = match e.kind() {
                    FailureKind::Interrupted => StatusCode::SERVICE_UNAVAILABLE,
                    FailureKind::TimedOut => StatusCode::GATEWAY_TIMEOUT,
                    FailureKind::DeliveryRejected | FailureKind::ExhaustedRetries => StatusCode::BAD_GATEWAY,
                };
                tracing::warn!(error = %e, kind = e.kind().as_str(), "Dispatch failed");
                (status, e.kind().as_str(), format!("Failed to send notification: {e}"))
            }
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification::DeliveryError;
    use std::time::Duration;

    #[test]
    fn test_dispatch_status_mapping() {
        let cases = [
            (DispatchError::Interrupted, StatusCode::SERVICE_UNAVAILABLE),
            (DispatchError::TimedOut(Duration::from_secs(10)), StatusCode::GATEWAY_TIMEOUT),
            (DispatchError::DeliveryRejected(DeliveryError::Unregistered), StatusCode::BAD_GATEWAY),
            (
                DispatchError::ExhaustedRetries { attempts: 3, last_error: DeliveryError::QuotaExceeded },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_and_not_found_mapping() {
        assert_eq!(AppError::from(IntentError::EmptyTitle).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(RegistryError::NotFound("t".into())).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
