use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub fcm: FcmConfig,

    #[command(flatten)]
    pub scheduler: SchedulerConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "NOTIFY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "NOTIFY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port for the management server (health checks)
    #[arg(long, env = "NOTIFY_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// How long to wait for background tasks to finish on shutdown
    #[arg(long, env = "NOTIFY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct FcmConfig {
    /// Maximum number of delivery attempts per notification (including the first)
    #[arg(
        long,
        env = "NOTIFY_FCM_MAX_RETRY_ATTEMPTS",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_retry_attempts: u32,

    /// Fixed delay between delivery attempts in milliseconds
    #[arg(long, env = "NOTIFY_FCM_RETRY_DELAY_MS", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// How long to wait for the push backend to answer a single attempt
    #[arg(
        long,
        env = "NOTIFY_FCM_ASYNC_TIMEOUT_SECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub async_timeout_seconds: u64,

    /// Reserved: batch sending is not used by the single-send path
    #[arg(long, env = "NOTIFY_FCM_ENABLE_BATCH_SENDING", default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_batch_sending: bool,

    /// Reserved: maximum batch size when batch sending is enabled
    #[arg(
        long,
        env = "NOTIFY_FCM_BATCH_SIZE",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub batch_size: u32,

    /// Firebase project id used to build the send endpoint
    #[arg(long, env = "NOTIFY_FCM_PROJECT_ID")]
    pub fcm_project_id: Option<String>,

    /// OAuth2 bearer token for the FCM HTTP v1 API
    #[arg(long, env = "NOTIFY_FCM_ACCESS_TOKEN")]
    pub fcm_access_token: Option<String>,

    /// Base URL of the FCM API (override for testing against a fake backend)
    #[arg(long, env = "NOTIFY_FCM_ENDPOINT", default_value = "https://fcm.googleapis.com")]
    pub fcm_endpoint: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchedulerConfig {
    /// Cron expression (sec min hour day-of-month month day-of-week) for the daily notification, in UTC
    #[arg(long, env = "NOTIFY_DAILY_NOTIFICATION_CRON", default_value = "0 0 0 * * *")]
    pub daily_notification_cron: String,

    /// Whether the daily notification job runs at all
    #[arg(long, env = "NOTIFY_DAILY_NOTIFICATION_ENABLED", default_value_t = true, action = clap::ArgAction::Set)]
    pub daily_notification_enabled: bool,

    /// Topic the daily notification is sent to
    #[arg(long, env = "NOTIFY_DAILY_TOPIC", default_value = "daily")]
    pub daily_topic: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "NOTIFY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for traces and metrics (e.g. http://localhost:4317)
    #[arg(long, env = "NOTIFY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["notification-server"]).unwrap();
        assert_eq!(config.fcm.max_retry_attempts, 3);
        assert_eq!(config.fcm.retry_delay_ms, 1000);
        assert_eq!(config.fcm.async_timeout_seconds, 10);
        assert!(config.fcm.enable_batch_sending);
        assert_eq!(config.fcm.batch_size, 100);
        assert_eq!(config.scheduler.daily_notification_cron, "0 0 0 * * *");
        assert_eq!(config.telemetry.log_format, LogFormat::Text);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let res = Config::try_parse_from(["notification-server", "--max-retry-attempts", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let res = Config::try_parse_from(["notification-server", "--async-timeout-seconds", "0"]);
        assert!(res.is_err());

        let config = Config::try_parse_from(["notification-server", "--async-timeout-seconds", "1"]).unwrap();
        assert_eq!(config.fcm.async_timeout_seconds, 1);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "notification-server",
            "--max-retry-attempts",
            "5",
            "--retry-delay-ms",
            "250",
            "--enable-batch-sending",
            "false",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.fcm.max_retry_attempts, 5);
        assert_eq!(config.fcm.retry_delay_ms, 250);
        assert!(!config.fcm.enable_batch_sending);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }
}
