use crate::config::SchedulerConfig;
use crate::domain::notification::{IntentError, SendIntent, Target};
use crate::services::notification::Dispatcher;
use chrono::{DateTime, Utc};
use cron::Schedule;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::str::FromStr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;

pub const DAILY_TITLE: &str = "Daily notification";
pub const DAILY_BODY: &str = "This is a daily notification";

#[derive(Clone, Debug)]
struct Metrics {
    fired: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("notification-server");
        Self {
            fired: meter
                .u64_counter("scheduled_dispatch_total")
                .with_description("Total scheduled notification dispatches by outcome")
                .build(),
        }
    }
}

/// Sends a fixed notification to a topic on a cron schedule.
///
/// Each firing hands the intent to the dispatcher and moves on; the outcome is
/// only logged. Firings missed while the process was down are not replayed.
#[derive(Debug)]
pub struct DailyNotificationWorker {
    dispatcher: Dispatcher,
    schedule: Schedule,
    topic: String,
    metrics: Metrics,
}

impl DailyNotificationWorker {
    /// # Errors
    /// Returns an error if the cron expression cannot be parsed.
    pub fn new(dispatcher: Dispatcher, config: &SchedulerConfig) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(&config.daily_notification_cron).map_err(|e| {
            anyhow::anyhow!("Invalid daily notification cron '{}': {e}", config.daily_notification_cron)
        })?;
        // Surface a bad topic at startup rather than at the first firing.
        Self::daily_intent(&config.daily_topic)?;

        Ok(Self { dispatcher, schedule, topic: config.daily_topic.clone(), metrics: Metrics::new() })
    }

    /// # Errors
    /// Returns `IntentError::EmptyTopic` if the topic is blank.
    pub fn daily_intent(topic: &str) -> Result<SendIntent, IntentError> {
        SendIntent::new(DAILY_TITLE, DAILY_BODY, Target::Topic(topic.to_string()))
    }

    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    pub async fn run(self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut last_fired: Option<DateTime<Utc>> = None;

        while !*shutdown.borrow() {
            let now = Utc::now();
            let from = last_fired.map_or(now, |last| last.max(now));
            let Some(next) = self.next_after(from) else {
                tracing::warn!("Daily notification schedule has no upcoming firings");
                break;
            };
            let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::debug!(next = %next, delay_secs = delay.as_secs(), "Next daily notification scheduled");

            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    last_fired = Some(next);
                    drop(self.fire());
                }
                res = shutdown.changed() => {
                    if res.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Daily notification worker shutting down...");
    }

    /// Starts one scheduled dispatch and returns the task that logs its outcome.
    pub fn fire(&self) -> JoinHandle<()> {
        tracing::info!(topic = %self.topic, "Sending daily notification...");

        let handle = match Self::daily_intent(&self.topic) {
            Ok(intent) => self.dispatcher.dispatch(intent),
            Err(e) => {
                tracing::error!(error = %e, "Daily notification intent is invalid");
                return tokio::spawn(async {});
            }
        };

        let metrics = self.metrics.clone();
        tokio::spawn(
            async move {
                match handle.await {
                    Ok(message_id) => {
                        tracing::info!(message_id = %message_id, "Daily notification sent");
                        metrics.fired.add(1, &[KeyValue::new("outcome", "succeeded")]);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, kind = e.kind().as_str(), "Daily notification failed");
                        metrics.fired.add(1, &[KeyValue::new("outcome", e.kind().as_str())]);
                    }
                }
            }
            .instrument(tracing::info_span!("daily_notification")),
        )
    }
}
