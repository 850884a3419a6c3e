pub mod daily_notification;

pub use daily_notification::DailyNotificationWorker;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Background workers assembled at startup and spawned once the server is ready.
#[derive(Debug, Default)]
pub struct Workers {
    pub daily_notification: Option<DailyNotificationWorker>,
}

impl Workers {
    #[must_use]
    pub fn spawn_all(self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::new();

        if let Some(worker) = self.daily_notification {
            tasks.push(tokio::spawn(worker.run(shutdown).instrument(tracing::info_span!("daily_notification_worker"))));
        }

        tasks
    }
}
