use crate::domain::notification::MessageId;
use crate::services::notification::message::Message;
use crate::services::notification::provider::{DeliveryClient, DeliveryError};
use async_trait::async_trait;
use uuid::Uuid;

/// Accepts every message without contacting a backend. Used when no push
/// credentials are configured so the rest of the server stays usable.
#[derive(Debug, Default)]
pub struct LogDeliveryClient;

#[async_trait]
impl DeliveryClient for LogDeliveryClient {
    async fn send(&self, message: &Message) -> Result<MessageId, DeliveryError> {
        let message_id = format!("local/{}", Uuid::new_v4());
        tracing::info!(
            message_id = %message_id,
            token = message.token(),
            topic = message.topic(),
            title = %message.notification.title,
            "STUB: Push notification not delivered (no FCM credentials configured)"
        );
        Ok(message_id)
    }
}
