#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate, unreachable_pub)]
use async_trait::async_trait;
use clap::Parser;
use notification_server::AppBuilder;
use notification_server::config::Config;
use notification_server::services::notification::{DeliveryClient, DeliveryError, Message};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::watch;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("notification_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config::try_parse_from([
        "notification-server",
        "--host",
        "127.0.0.1",
        "--retry-delay-ms",
        "50",
        "--async-timeout-seconds",
        "1",
        "--daily-notification-enabled",
        "false",
    ])
    .unwrap()
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    Ok(String),
    Unavailable,
    Unregistered,
    Hang,
}

/// Delivery client that replays queued responses and records every message.
/// Once the queue is empty it keeps answering with `fallback`.
#[derive(Debug)]
pub struct MockDeliveryClient {
    responses: Mutex<VecDeque<MockResponse>>,
    fallback: MockResponse,
    sent: Mutex<Vec<Message>>,
}

impl MockDeliveryClient {
    pub fn new(responses: Vec<MockResponse>, fallback: MockResponse) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses.into()), fallback, sent: Mutex::default() })
    }

    pub fn succeeding() -> Arc<Self> {
        Self::new(vec![], MockResponse::Ok("projects/test/messages/1".into()))
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryClient for MockDeliveryClient {
    async fn send(&self, message: &Message) -> Result<String, DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        let response = self.responses.lock().unwrap().pop_front().unwrap_or_else(|| self.fallback.clone());

        match response {
            MockResponse::Ok(id) => Ok(id),
            MockResponse::Unavailable => Err(DeliveryError::Unavailable("503 Service Unavailable".into())),
            MockResponse::Unregistered => Err(DeliveryError::Unregistered),
            MockResponse::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too-late".into())
            }
        }
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub delivery: Arc<MockDeliveryClient>,
    pub shutdown_tx: watch::Sender<bool>,
    pub workers: Vec<tokio::task::JoinHandle<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(get_test_config(), MockDeliveryClient::succeeding()).await
    }

    pub async fn spawn_with_delivery(delivery: Arc<MockDeliveryClient>) -> Self {
        Self::spawn_with(get_test_config(), delivery).await
    }

    pub async fn spawn_with(config: Config, delivery: Arc<MockDeliveryClient>) -> Self {
        setup_tracing();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let app = AppBuilder::new(config)
            .with_delivery_client(Arc::clone(&delivery) as Arc<dyn DeliveryClient>)
            .with_shutdown_rx(shutdown_rx.clone())
            .build()
            .unwrap();

        let api_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let workers = app.workers.spawn_all(shutdown_rx.clone());

        let mut api_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            axum::serve(api_listener, app.router)
                .with_graceful_shutdown(async move {
                    let _ = api_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        let mut mgmt_rx = shutdown_rx;
        tokio::spawn(async move {
            axum::serve(mgmt_listener, app.mgmt_router)
                .with_graceful_shutdown(async move {
                    let _ = mgmt_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), delivery, shutdown_tx, workers }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/notifications{}", self.server_url, path)
    }
}
