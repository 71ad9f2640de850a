use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::RelayError;

/// Bound on waiting for the bus to acknowledge a publish.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on a single webhook submission.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(feature = "debug-logs")]
pub const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(feature = "debug-logs"))]
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// AWS account id that owns the queue.
    pub project_id: String,
    /// Queue name messages are published to.
    pub topic_id: String,
    pub slack_webhook_url: Url,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RelayError::Config(format!("{key} is empty")))
        };

        let webhook = required("SLACK_WEBHOOK_URL")?;
        let slack_webhook_url = Url::parse(&webhook)
            .map_err(|e| RelayError::Config(format!("SLACK_WEBHOOK_URL: {e}")))?;
        if !matches!(slack_webhook_url.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "SLACK_WEBHOOK_URL: unsupported scheme {}",
                slack_webhook_url.scheme()
            )));
        }

        Ok(Self {
            project_id: required("PROJECT_ID")?,
            topic_id: required("TOPIC_ID")?,
            slack_webhook_url,
            log_level: lookup("LOG_LEVEL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}
