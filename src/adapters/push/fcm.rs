use crate::config::FcmConfig;
use crate::domain::notification::MessageId;
use crate::services::notification::message::Message;
use crate::services::notification::provider::{DeliveryClient, DeliveryError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Client for the FCM HTTP v1 `messages:send` endpoint.
#[derive(Debug, Clone)]
pub struct FcmDeliveryClient {
    http: reqwest::Client,
    send_url: String,
    access_token: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: &'a Message,
}

#[derive(Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FcmDeliveryClient {
    #[must_use]
    pub fn new(endpoint: &str, project_id: &str, access_token: String) -> Self {
        let send_url = format!("{}/v1/projects/{}/messages:send", endpoint.trim_end_matches('/'), project_id);
        Self { http: reqwest::Client::new(), send_url, access_token }
    }

    /// Returns `None` when the project id or access token is not configured.
    #[must_use]
    pub fn from_config(config: &FcmConfig) -> Option<Self> {
        match (&config.fcm_project_id, &config.fcm_access_token) {
            (Some(project_id), Some(token)) if !project_id.is_empty() && !token.is_empty() => {
                Some(Self::new(&config.fcm_endpoint, project_id, token.clone()))
            }
            _ => None,
        }
    }

    fn classify(status: StatusCode, body: &str) -> DeliveryError {
        let detail =
            serde_json::from_str::<ErrorResponse>(body).map_or_else(|_| body.to_string(), |r| r.error.message);

        if status == StatusCode::NOT_FOUND || body.contains("UNREGISTERED") {
            return DeliveryError::Unregistered;
        }

        match status {
            StatusCode::BAD_REQUEST => DeliveryError::InvalidArgument(detail),
            StatusCode::TOO_MANY_REQUESTS => DeliveryError::QuotaExceeded,
            _ => DeliveryError::Unavailable(format!("{status}: {detail}")),
        }
    }
}

#[async_trait]
impl DeliveryClient for FcmDeliveryClient {
    #[tracing::instrument(level = "debug", skip_all, err)]
    async fn send(&self, message: &Message) -> Result<MessageId, DeliveryError> {
        let resp = self
            .http
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(|e| DeliveryError::Other(e.into()))?;

        let status = resp.status();
        if status.is_success() {
            let body: SendResponse = resp.json().await.map_err(|e| DeliveryError::Other(e.into()))?;
            return Ok(body.name);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Self::classify(status, &body))
    }
}
