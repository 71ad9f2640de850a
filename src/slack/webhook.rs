//! Downstream submission through a Slack incoming webhook.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::core::models::Message;
use crate::errors::RelayError;

/// Delivers a validated message to the chat endpoint.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn submit(&self, message: &Message) -> Result<(), RelayError>;
}

pub struct WebhookClient {
    http_client: HttpClient,
    webhook_url: Url,
}

impl WebhookClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(webhook_url: Url, timeout: Duration) -> Result<Self, RelayError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            webhook_url,
        })
    }
}

#[async_trait]
impl MessageSink for WebhookClient {
    async fn submit(&self, message: &Message) -> Result<(), RelayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .http_client
            .post(self.webhook_url.clone())
            .headers(headers)
            .body(message.encode()?)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!("Slack webhook POST failed: status={} body={}", status, body_text);
            return Err(RelayError::Submit(format!("status={status} body={body_text}")));
        }

        debug!("Slack webhook accepted message (status={})", status);
        Ok(())
    }
}
