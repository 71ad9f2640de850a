//! Bus publish boundary backed by SQS.

use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::errors::RelayError;

/// Publishes an encoded message and returns the identifier the bus assigned to it.
#[async_trait]
pub trait BusPublisher: Send + Sync {
    async fn publish(&self, payload: &[u8]) -> Result<String, RelayError>;
}

/// Publish once and wait at most `timeout` for the acknowledgement.
///
/// An elapsed wait is reported exactly like a rejected publish: the message
/// may or may not have been stored, and the caller is expected to resubmit.
///
/// # Errors
///
/// Returns [`RelayError::Publish`] on bus failure or timeout.
pub async fn publish_with_timeout(
    publisher: &dyn BusPublisher,
    payload: &[u8],
    timeout: Duration,
) -> Result<String, RelayError> {
    match tokio::time::timeout(timeout, publisher.publish(payload)).await {
        Ok(result) => result,
        Err(_) => Err(RelayError::Publish(format!(
            "no acknowledgement within {}s",
            timeout.as_secs()
        ))),
    }
}

pub struct SqsPublisher {
    client: SqsClient,
    queue_url: String,
}

impl SqsPublisher {
    /// Resolve the queue named by `topic_id` in account `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be looked up.
    pub async fn connect(config: &AppConfig) -> Result<Self, RelayError> {
        let shared_config = aws_config::from_env().load().await;
        let client = SqsClient::new(&shared_config);

        let output = client
            .get_queue_url()
            .queue_name(&config.topic_id)
            .queue_owner_aws_account_id(&config.project_id)
            .send()
            .await?;
        let queue_url = output
            .queue_url()
            .ok_or_else(|| RelayError::Publish(format!("queue {} has no URL", config.topic_id)))?
            .to_string();

        info!(queue_url = %queue_url, "Resolved SQS queue");
        Ok(Self::new(client, queue_url))
    }

    #[must_use]
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl BusPublisher for SqsPublisher {
    async fn publish(&self, payload: &[u8]) -> Result<String, RelayError> {
        let message_body = std::str::from_utf8(payload)
            .map_err(|e| RelayError::Publish(format!("payload is not UTF-8: {e}")))?;

        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message_body)
            .send()
            .await?;

        let id = output
            .message_id()
            .ok_or_else(|| RelayError::Publish("SQS returned no message id".to_string()))?;
        debug!(message_id = %id, "SQS acknowledged publish");
        Ok(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledPublisher;

    #[async_trait]
    impl BusPublisher for StalledPublisher {
        async fn publish(&self, _payload: &[u8]) -> Result<String, RelayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too-late".to_string())
        }
    }

    struct InstantPublisher;

    #[async_trait]
    impl BusPublisher for InstantPublisher {
        async fn publish(&self, _payload: &[u8]) -> Result<String, RelayError> {
            Ok("msg-1".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_reported_as_publish_error() {
        let started = tokio::time::Instant::now();
        let err = publish_with_timeout(&StalledPublisher, b"{}", Duration::from_secs(10))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Publish(ref m) if m.contains("10s")));
        assert!(err.is_retryable());
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(10) && waited < Duration::from_secs(11));
    }

    #[tokio::test]
    async fn acknowledged_publish_returns_id() {
        let id = publish_with_timeout(&InstantPublisher, b"{}", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(id, "msg-1");
    }
}
