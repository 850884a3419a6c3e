use crate::domain::notification::MessageId;
use crate::services::notification::message::Message;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Token is no longer registered")]
    Unregistered,
    #[error("Request rejected by push backend: {0}")]
    InvalidArgument(String),
    #[error("Rate limit exceeded")]
    QuotaExceeded,
    #[error("Push backend unavailable: {0}")]
    Unavailable(String),
    #[error("External service error: {0}")]
    Other(#[from] anyhow::Error),
}

impl DeliveryError {
    /// Whether the backend considers the failure temporary. Logged with each
    /// rejected attempt; the retry decision does not depend on it.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::Unregistered | Self::InvalidArgument(_))
    }
}

#[async_trait]
pub trait DeliveryClient: Send + Sync + std::fmt::Debug {
    /// Hands a message to the push backend and returns the id it was accepted under.
    ///
    /// # Errors
    /// Returns a [`DeliveryError`] when the backend refuses the message or cannot be reached.
    async fn send(&self, message: &Message) -> Result<MessageId, DeliveryError>;
}
