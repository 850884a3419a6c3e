use std::fmt;
use thiserror::Error;

/// Identifier the push backend assigns to an accepted message.
pub type MessageId = String;

/// Where a notification is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single installed application instance.
    Token(String),
    /// A named broadcast channel; the backend owns the subscriber set.
    Topic(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => write!(f, "token:{token}"),
            Self::Topic(topic) => write!(f, "topic:{topic}"),
        }
    }
}

/// Canonical form of a device token. Every path that stores, looks up or
/// sends to a token goes through this.
#[must_use]
pub fn normalize_token(token: &str) -> &str {
    token.trim()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Body is required")]
    EmptyBody,
    #[error("Device token is required")]
    EmptyToken,
    #[error("Topic is required")]
    EmptyTopic,
}

/// A validated request to push one notification.
///
/// Fields are private so that every instance has passed [`SendIntent::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendIntent {
    title: String,
    body: String,
    target: Target,
    category: Option<String>,
}

impl SendIntent {
    /// Creates an intent after checking that title, body and target are non-blank.
    ///
    /// # Errors
    /// Returns the first [`IntentError`] found, checked in title, body, target order.
    pub fn new(title: impl Into<String>, body: impl Into<String>, target: Target) -> Result<Self, IntentError> {
        let title = title.into();
        let body = body.into();

        if title.trim().is_empty() {
            return Err(IntentError::EmptyTitle);
        }
        if body.trim().is_empty() {
            return Err(IntentError::EmptyBody);
        }
        let target = match target {
            Target::Token(token) => {
                let token = normalize_token(&token);
                if token.is_empty() {
                    return Err(IntentError::EmptyToken);
                }
                Target::Token(token.to_string())
            }
            Target::Topic(topic) if topic.trim().is_empty() => return Err(IntentError::EmptyTopic),
            topic @ Target::Topic(_) => topic,
        };

        Ok(Self { title, body, target, category: None })
    }

    /// Attaches a platform category hint. Blank categories are ignored.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}
