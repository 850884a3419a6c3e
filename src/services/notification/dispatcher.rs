use crate::config::FcmConfig;
use crate::domain::notification::{MessageId, SendIntent};
use crate::services::notification::message::Message;
use crate::services::notification::provider::{DeliveryClient, DeliveryError};
use crate::services::notification::retry::RetryPolicy;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tracing::Instrument;

#[derive(Clone, Debug)]
struct Metrics {
    dispatch_total: Counter<u64>,
    attempts_total: Counter<u64>,
    retries_total: Counter<u64>,
    duration_seconds: Histogram<f64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("notification-server");
        Self {
            dispatch_total: meter
                .u64_counter("dispatch_total")
                .with_description("Total dispatches by terminal outcome")
                .build(),
            attempts_total: meter
                .u64_counter("dispatch_attempts_total")
                .with_description("Total send attempts made against the push backend")
                .build(),
            retries_total: meter
                .u64_counter("dispatch_retries_total")
                .with_description("Total attempts made after a transient failure")
                .build(),
            duration_seconds: meter
                .f64_histogram("dispatch_duration_seconds")
                .with_description("Time from dispatch start to terminal outcome")
                .build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Interrupted,
    TimedOut,
    DeliveryRejected,
    ExhaustedRetries,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interrupted => "interrupted",
            Self::TimedOut => "timed_out",
            Self::DeliveryRejected => "delivery_rejected",
            Self::ExhaustedRetries => "exhausted_retries",
        }
    }
}

/// Failure of a dispatch.
///
/// `DeliveryRejected` describes a single failed attempt and is always handed
/// to the retry policy; once the ceiling is reached it becomes
/// `ExhaustedRetries`. The other kinds are terminal as produced.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Notification sending was interrupted")]
    Interrupted,
    #[error("Notification sending timed out after {} seconds", .0.as_secs())]
    TimedOut(Duration),
    #[error("Notification rejected by push backend: {0}")]
    DeliveryRejected(#[source] DeliveryError),
    #[error("Failed to send notification after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last_error: DeliveryError,
    },
}

impl DispatchError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Interrupted => FailureKind::Interrupted,
            Self::TimedOut(_) => FailureKind::TimedOut,
            Self::DeliveryRejected(_) => FailureKind::DeliveryRejected,
            Self::ExhaustedRetries { .. } => FailureKind::ExhaustedRetries,
        }
    }
}

pub type DispatchOutcome = Result<MessageId, DispatchError>;

/// One-shot handle to the outcome of a dispatch running on another task.
///
/// Resolves to [`DispatchError::Interrupted`] if the task is torn down before
/// it reports.
#[derive(Debug)]
pub struct DispatchHandle {
    rx: oneshot::Receiver<DispatchOutcome>,
}

impl Future for DispatchHandle {
    type Output = DispatchOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| res.unwrap_or(Err(DispatchError::Interrupted)))
    }
}

/// Sends notifications through a [`DeliveryClient`] with a bounded wait per
/// attempt and fixed-delay retries for transient backend errors.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: Arc<dyn DeliveryClient>,
    retry: RetryPolicy,
    timeout: Duration,
    shutdown: watch::Receiver<bool>,
    metrics: Metrics,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        client: Arc<dyn DeliveryClient>,
        retry: RetryPolicy,
        timeout: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self { client, retry, timeout, shutdown, metrics: Metrics::new() }
    }

    #[must_use]
    pub fn from_config(client: Arc<dyn DeliveryClient>, config: &FcmConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self::new(client, RetryPolicy::from_config(config), Duration::from_secs(config.async_timeout_seconds), shutdown)
    }

    /// Starts a dispatch on a new task and returns immediately.
    pub fn dispatch(&self, intent: SendIntent) -> DispatchHandle {
        let (tx, rx) = oneshot::channel();
        let dispatcher = self.clone();
        let span = tracing::info_span!("dispatch", destination = %intent.target());

        tokio::spawn(
            async move {
                let outcome = dispatcher.execute(intent).await;
                // The caller may have stopped listening; the outcome is already logged.
                let _ = tx.send(outcome);
            }
            .instrument(span),
        );

        DispatchHandle { rx }
    }

    /// Runs the dispatch state machine on the current task.
    ///
    /// # Errors
    /// Returns the terminal [`DispatchError`] when no attempt succeeded.
    pub async fn execute(&self, intent: SendIntent) -> DispatchOutcome {
        let start = tokio::time::Instant::now();
        let message = Message::build(&intent);
        let mut shutdown = self.shutdown.clone();

        let outcome = tokio::select! {
            res = self.send_with_retry(&message) => res,
            () = wait_for_shutdown(&mut shutdown) => Err(DispatchError::Interrupted),
        };

        let label = match &outcome {
            Ok(message_id) => {
                tracing::info!(message_id = %message_id, "Successfully sent notification");
                "succeeded"
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind().as_str(), "Failed to send notification");
                e.kind().as_str()
            }
        };
        self.metrics.dispatch_total.add(1, &[KeyValue::new("outcome", label)]);
        self.metrics.duration_seconds.record(start.elapsed().as_secs_f64(), &[KeyValue::new("outcome", label)]);

        outcome
    }

    async fn send_with_retry(&self, message: &Message) -> DispatchOutcome {
        let mut attempt = 0u32;

        let res = self
            .retry
            .run(
                || {
                    attempt += 1;
                    self.send_once(message, attempt)
                },
                |e: &DispatchError| matches!(e, DispatchError::DeliveryRejected(_)),
            )
            .await;

        match res {
            Err(DispatchError::DeliveryRejected(last_error)) => {
                Err(DispatchError::ExhaustedRetries { attempts: self.retry.max_attempts(), last_error })
            }
            other => other,
        }
    }

    async fn send_once(&self, message: &Message, attempt: u32) -> DispatchOutcome {
        tracing::debug!(attempt, max_attempts = self.retry.max_attempts(), "Sending notification");
        self.metrics.attempts_total.add(1, &[]);
        if attempt > 1 {
            self.metrics.retries_total.add(1, &[]);
        }

        match tokio::time::timeout(self.timeout, self.client.send(message)).await {
            Ok(Ok(message_id)) => Ok(message_id),
            Ok(Err(e)) => {
                tracing::debug!(attempt, error = %e, transient = e.is_transient(), "Push backend rejected message");
                Err(DispatchError::DeliveryRejected(e))
            }
            Err(_) => {
                tracing::warn!(attempt, timeout_secs = self.timeout.as_secs(), "Push backend did not answer in time");
                Err(DispatchError::TimedOut(self.timeout))
            }
        }
    }
}

// Resolves once shutdown is signalled. Never resolves if the sender is gone
// without signalling.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|&s| s).await.is_err() {
        std::future::pending::<()>().await;
    }
}
