#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;
pub mod workers;

use crate::api::{AppState, MgmtState};
use crate::config::Config;
use crate::services::notification::{DeliveryClient, Dispatcher};
use crate::services::token_registry::TokenRegistry;
use crate::workers::{DailyNotificationWorker, Workers};
use axum::Router;
use std::sync::Arc;
use tokio::sync::watch;

/// Fully wired application, ready to be served.
#[derive(Debug)]
pub struct App {
    pub router: Router,
    pub mgmt_router: Router,
    pub workers: Workers,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    delivery_client: Option<Arc<dyn DeliveryClient>>,
    shutdown_rx: Option<watch::Receiver<bool>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, delivery_client: None, shutdown_rx: None }
    }

    /// Overrides the delivery client chosen from configuration.
    #[must_use]
    pub fn with_delivery_client(mut self, client: Arc<dyn DeliveryClient>) -> Self {
        self.delivery_client = Some(client);
        self
    }

    #[must_use]
    pub fn with_shutdown_rx(mut self, shutdown_rx: watch::Receiver<bool>) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    /// Wires the dispatcher, token registry, routers and workers.
    ///
    /// # Errors
    /// Returns an error if no shutdown receiver was provided or the scheduler
    /// configuration is invalid.
    pub fn build(self) -> anyhow::Result<App> {
        let shutdown_rx = self.shutdown_rx.ok_or_else(|| anyhow::anyhow!("Shutdown receiver is required"))?;
        let delivery_client =
            self.delivery_client.unwrap_or_else(|| adapters::push::from_config(&self.config.fcm));

        let fcm = &self.config.fcm;
        tracing::info!(
            max_attempts = fcm.max_retry_attempts,
            retry_delay_ms = fcm.retry_delay_ms,
            timeout_secs = fcm.async_timeout_seconds,
            batch_sending = fcm.enable_batch_sending,
            batch_size = fcm.batch_size,
            "Configured notification dispatch"
        );

        let dispatcher = Dispatcher::from_config(delivery_client, fcm, shutdown_rx.clone());
        let token_registry = TokenRegistry::new();

        let daily_notification = if self.config.scheduler.daily_notification_enabled {
            Some(DailyNotificationWorker::new(dispatcher.clone(), &self.config.scheduler)?)
        } else {
            tracing::info!("Daily notification disabled");
            None
        };

        let router = api::app_router(AppState { dispatcher, token_registry: token_registry.clone() });
        let mgmt_router = api::mgmt_router(MgmtState { token_registry, shutdown_rx });

        Ok(App { router, mgmt_router, workers: Workers { daily_notification } })
    }
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        let _ = shutdown_tx.send(true);
    });
}

/// Routes panics through `tracing` so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(panic.location = %location, panic.payload = %payload, "Panic occurred");
    }));
}
