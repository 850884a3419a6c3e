use crate::domain::notification::{IntentError, MessageId, SendIntent, Target};
use serde::{Deserialize, Serialize};

/// General send request. `sendToTopic` picks the target; for device sends an
/// accompanying `topic` becomes the APNs category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub topic: Option<String>,
    pub token: Option<String>,
    pub send_to_topic: bool,
}

impl NotificationRequest {
    /// # Errors
    /// Returns an [`IntentError`] if a required field is missing or blank.
    pub fn into_intent(self) -> Result<SendIntent, IntentError> {
        if self.send_to_topic {
            let topic = self.topic.unwrap_or_default();
            SendIntent::new(self.title, self.body, Target::Topic(topic))
        } else {
            let token = self.token.unwrap_or_default();
            Ok(SendIntent::new(self.title, self.body, Target::Token(token))?.with_category(self.topic))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicNotificationRequest {
    pub title: String,
    pub body: String,
    pub topic: String,
}

impl TopicNotificationRequest {
    /// # Errors
    /// Returns an [`IntentError`] if a required field is missing or blank.
    pub fn into_intent(self) -> Result<SendIntent, IntentError> {
        SendIntent::new(self.title, self.body, Target::Topic(self.topic))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceNotificationRequest {
    pub title: String,
    pub body: String,
    pub device_token: String,
}

impl DeviceNotificationRequest {
    /// # Errors
    /// Returns an [`IntentError`] if a required field is missing or blank.
    pub fn into_intent(self) -> Result<SendIntent, IntentError> {
        SendIntent::new(self.title, self.body, Target::Token(self.device_token))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub status: u16,
    pub message: String,
    pub message_id: MessageId,
}

impl NotificationResponse {
    #[must_use]
    pub fn sent(message_id: MessageId) -> Self {
        Self { status: 200, message: "Notification sent successfully!".to_string(), message_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_request_to_token_uses_topic_as_category() {
        let req: NotificationRequest =
            serde_json::from_str(r#"{"title":"T","body":"B","token":"abc","topic":"chat","sendToTopic":false}"#)
                .unwrap();
        let intent = req.into_intent().unwrap();
        assert_eq!(intent.target(), &Target::Token("abc".into()));
        assert_eq!(intent.category(), Some("chat"));
    }

    #[test]
    fn test_generic_request_to_topic() {
        let req: NotificationRequest =
            serde_json::from_str(r#"{"title":"T","body":"B","topic":"news","sendToTopic":true}"#).unwrap();
        let intent = req.into_intent().unwrap();
        assert_eq!(intent.target(), &Target::Topic("news".into()));
        assert_eq!(intent.category(), None);
    }

    #[test]
    fn test_generic_request_missing_target() {
        let req: NotificationRequest = serde_json::from_str(r#"{"title":"T","body":"B"}"#).unwrap();
        assert_eq!(req.into_intent(), Err(IntentError::EmptyToken));

        let req: NotificationRequest =
            serde_json::from_str(r#"{"title":"T","body":"B","token":"abc","sendToTopic":true}"#).unwrap();
        assert_eq!(req.into_intent(), Err(IntentError::EmptyTopic));
    }

    #[test]
    fn test_device_request_validation() {
        let req: DeviceNotificationRequest = serde_json::from_str(r#"{"title":"T","deviceToken":"abc"}"#).unwrap();
        assert_eq!(req.into_intent(), Err(IntentError::EmptyBody));

        let req: DeviceNotificationRequest =
            serde_json::from_str(r#"{"title":"T","body":"B","deviceToken":"abc"}"#).unwrap();
        assert_eq!(req.into_intent().unwrap().target(), &Target::Token("abc".into()));
    }

    #[test]
    fn test_topic_request_validation() {
        let req: TopicNotificationRequest = serde_json::from_str(r#"{"body":"B","topic":"news"}"#).unwrap();
        assert_eq!(req.into_intent(), Err(IntentError::EmptyTitle));
    }

    #[test]
    fn test_response_shape() {
        let value = serde_json::to_value(NotificationResponse::sent("m-1".into())).unwrap();
        assert_eq!(value["status"], 200);
        assert_eq!(value["messageId"], "m-1");
    }
}
