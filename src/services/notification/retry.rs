use crate::config::FcmConfig;
use backon::{ConstantBuilder, Retryable};
use std::future::Future;
use std::time::Duration;

/// Fixed-delay retry with a hard ceiling on the total number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; values below 1 are raised to 1.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        let max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        Self { max_attempts, delay }
    }

    #[must_use]
    pub const fn from_config(config: &FcmConfig) -> Self {
        Self::new(config.max_retry_attempts, Duration::from_millis(config.retry_delay_ms))
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    fn backoff(&self) -> ConstantBuilder {
        let retries = usize::try_from(self.max_attempts - 1).unwrap_or(usize::MAX);
        ConstantBuilder::default().with_delay(self.delay).with_max_times(retries)
    }

    /// Runs `operation` until it succeeds, fails with an error `is_retryable` rejects,
    /// or `max_attempts` tries have been made. The last error is returned unchanged.
    ///
    /// # Errors
    /// Returns the error of the final attempt.
    pub async fn run<T, E, F, Fut, P>(&self, operation: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts;
        let mut failed_attempts = 0u32;

        operation
            .retry(self.backoff())
            .when(is_retryable)
            .notify(|e: &E, delay: Duration| {
                failed_attempts += 1;
                tracing::warn!(
                    error = %e,
                    attempt = failed_attempts,
                    max_attempts,
                    delay_ms = delay.as_millis(),
                    "Attempt failed, retrying after backoff"
                );
            })
            .await
    }
}
