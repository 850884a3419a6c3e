pub mod fcm;
pub mod stub;

use crate::config::FcmConfig;
use crate::services::notification::DeliveryClient;
use std::sync::Arc;

/// Picks the FCM client when credentials are configured, otherwise the log-only stub.
#[must_use]
pub fn from_config(config: &FcmConfig) -> Arc<dyn DeliveryClient> {
    if let Some(client) = fcm::FcmDeliveryClient::from_config(config) {
        tracing::info!(endpoint = %config.fcm_endpoint, "Using FCM delivery client");
        Arc::new(client)
    } else {
        tracing::warn!("FCM credentials not configured, notifications will only be logged");
        Arc::new(stub::LogDeliveryClient)
    }
}
