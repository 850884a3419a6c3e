use crate::domain::notification::normalize_token;
use dashmap::DashSet;
use opentelemetry::{global, metrics::UpDownCounter};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Token not found: {0}")]
    NotFound(String),
}

#[derive(Clone, Debug)]
struct Metrics {
    registered_tokens: UpDownCounter<i64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("notification-server");
        Self {
            registered_tokens: meter
                .i64_up_down_counter("registered_tokens")
                .with_description("Number of device tokens currently registered")
                .build(),
        }
    }
}

/// Process-wide set of registered device tokens.
///
/// Contents live only as long as the process; nothing is persisted.
#[derive(Clone, Debug)]
pub struct TokenRegistry {
    tokens: Arc<DashSet<String>>,
    metrics: Metrics,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { tokens: Arc::new(DashSet::new()), metrics: Metrics::new() }
    }

    /// Adds a token in its normalized form. Returns `false` if it was already registered.
    pub fn add(&self, token: &str) -> bool {
        let inserted = self.tokens.insert(normalize_token(token).to_string());
        if inserted {
            self.metrics.registered_tokens.add(1, &[]);
        }
        inserted
    }

    /// Removes a token.
    ///
    /// # Errors
    /// Returns `RegistryError::NotFound` if the token is not registered.
    pub fn remove(&self, token: &str) -> Result<(), RegistryError> {
        let token = normalize_token(token);
        if self.tokens.remove(token).is_some() {
            self.metrics.registered_tokens.add(-1, &[]);
            Ok(())
        } else {
            Err(RegistryError::NotFound(token.to_string()))
        }
    }

    /// Snapshot of all registered tokens. Later changes are not reflected.
    #[must_use]
    pub fn list_all(&self) -> BTreeSet<String> {
        self.tokens.iter().map(|t| t.key().clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
