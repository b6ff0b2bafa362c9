use std::time::Duration;

use anyhow::{Context, Result};
use ecsrefresh_orchestrations::RefreshSettings;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "compact" => LogFormat::Compact,
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub log_format: LogFormat,
    pub settings: RefreshSettings,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = RefreshSettings::default();

        let secs = |key: &str, default: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{} must be a whole number of seconds", key)),
                None => Ok(default),
            }
        };

        let default_region = lookup("ECSREFRESH_DEFAULT_REGION")
            .or_else(|| lookup("AWS_REGION"))
            .unwrap_or(defaults.default_region.clone());

        Ok(Self {
            server_host: get("SERVER_HOST", "0.0.0.0"),
            server_port: get("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            log_format: LogFormat::parse(&get("ECSREFRESH_LOG_FORMAT", "pretty")),
            settings: RefreshSettings {
                alarm_settle: secs("ECSREFRESH_ALARM_SETTLE_SECS", defaults.alarm_settle)?,
                event_pacing: secs("ECSREFRESH_EVENT_PACING_SECS", defaults.event_pacing)?,
                event_source: get("ECSREFRESH_EVENT_SOURCE", &defaults.event_source),
                event_detail_type: get("ECSREFRESH_EVENT_DETAIL_TYPE", &defaults.event_detail_type),
                event_bus: get("ECSREFRESH_EVENT_BUS", &defaults.event_bus),
                default_region,
                trigger_cluster: get("ECSREFRESH_TRIGGER_CLUSTER", &defaults.trigger_cluster),
                trigger_service: get("ECSREFRESH_TRIGGER_SERVICE", &defaults.trigger_service),
            },
        })
    }
}
