use crate::domain::notification::{SendIntent, Target};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Time-to-live applied to direct device pushes.
pub const TOKEN_MESSAGE_TTL: Duration = Duration::from_secs(120);

/// Outbound message in the FCM HTTP v1 shape (the `message` object of a send request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apns: Option<ApnsConfig>,
    #[serde(flatten)]
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Token(String),
    Topic(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidPriority {
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidConfig {
    #[serde(serialize_with = "serialize_ttl")]
    pub ttl: Duration,
    pub priority: AndroidPriority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aps {
    pub category: String,
}

// FCM encodes durations as decimal seconds with an "s" suffix.
fn serialize_ttl<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let secs = ttl.as_secs();
    let nanos = ttl.subsec_nanos();
    if nanos == 0 {
        serializer.serialize_str(&format!("{secs}s"))
    } else {
        serializer.serialize_str(&format!("{secs}.{nanos:09}s"))
    }
}

impl Message {
    /// Builds the wire message for an intent.
    ///
    /// Token targets get a short TTL, high priority and an optional APNs category.
    /// Topic targets carry only the notification and topic name so the backend
    /// applies its own defaults to the fan-out.
    #[must_use]
    pub fn build(intent: &SendIntent) -> Self {
        let notification = Notification { title: intent.title().to_owned(), body: intent.body().to_owned() };

        match intent.target() {
            Target::Token(token) => Self {
                notification,
                android: Some(AndroidConfig { ttl: TOKEN_MESSAGE_TTL, priority: AndroidPriority::High }),
                apns: intent
                    .category()
                    .map(|category| ApnsConfig { payload: ApnsPayload { aps: Aps { category: category.to_owned() } } }),
                destination: Destination::Token(token.clone()),
            },
            Target::Topic(topic) => {
                Self { notification, android: None, apns: None, destination: Destination::Topic(topic.clone()) }
            }
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.android.as_ref().map(|a| a.ttl)
    }

    #[must_use]
    pub fn priority(&self) -> Option<AndroidPriority> {
        self.android.as_ref().map(|a| a.priority)
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        match &self.destination {
            Destination::Topic(topic) => Some(topic),
            Destination::Token(_) => None,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.destination {
            Destination::Token(token) => Some(token),
            Destination::Topic(_) => None,
        }
    }
}
