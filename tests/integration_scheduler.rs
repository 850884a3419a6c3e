#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, missing_debug_implementations, unreachable_pub)]
use common::{MockDeliveryClient, MockResponse};
use std::time::Duration;

mod common;

#[tokio::test]
async fn test_scheduled_notification_fires_to_daily_topic() {
    let mut config = common::get_test_config();
    config.scheduler.daily_notification_enabled = true;
    config.scheduler.daily_notification_cron = "* * * * * *".to_string();

    let app = common::TestApp::spawn_with(config, MockDeliveryClient::succeeding()).await;

    let start = std::time::Instant::now();
    while app.delivery.call_count() == 0 && start.elapsed() < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let sent = app.delivery.sent();
    assert!(!sent.is_empty(), "Scheduled notification should have been sent");
    assert_eq!(sent[0].topic(), Some("daily"));
    assert_eq!(sent[0].notification.title, "Daily notification");
    assert_eq!(sent[0].notification.body, "This is a daily notification");

    app.shutdown_tx.send(true).unwrap();
    for worker in app.workers {
        tokio::time::timeout(Duration::from_secs(2), worker).await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_scheduled_failure_does_not_stop_worker() {
    let mut config = common::get_test_config();
    config.scheduler.daily_notification_enabled = true;
    config.scheduler.daily_notification_cron = "* * * * * *".to_string();
    config.fcm.max_retry_attempts = 1;

    let delivery = MockDeliveryClient::new(vec![MockResponse::Unavailable], MockResponse::Ok("second-run".into()));
    let app = common::TestApp::spawn_with(config, delivery).await;

    // First firing fails, the next one a second later must still happen.
    let start = std::time::Instant::now();
    while app.delivery.call_count() < 2 && start.elapsed() < Duration::from_secs(6) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert!(app.delivery.call_count() >= 2);
    app.shutdown_tx.send(true).unwrap();
}
