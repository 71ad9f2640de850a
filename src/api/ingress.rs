//! Ingress relay: validate an inbound message and hand it to the bus.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::sqs::{BusPublisher, publish_with_timeout};
use crate::core::config::PUBLISH_TIMEOUT;
use crate::core::models::{MESSAGE_FORMAT_HINT, Message};
use crate::errors::RelayError;

/// Result of one inbound submission.
#[derive(Debug)]
pub enum IngressOutcome {
    /// The bus acknowledged the message under `message_id`.
    Accepted { message_id: String },
    /// The request itself is unusable; resubmitting it unchanged will not help.
    Rejected(RelayError),
    /// The bus did not confirm the publish; the caller should resubmit.
    UpstreamFailure(RelayError),
}

impl IngressOutcome {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            IngressOutcome::Accepted { .. } => 200,
            IngressOutcome::Rejected(_) => 400,
            IngressOutcome::UpstreamFailure(_) => 500,
        }
    }

    /// Human-readable response text.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            IngressOutcome::Accepted { message_id } => format!("Success with ID: {message_id}\n"),
            IngressOutcome::Rejected(e) => {
                format!("Available structure: {MESSAGE_FORMAT_HINT}\n{e}")
            }
            IngressOutcome::UpstreamFailure(e) => e.to_string(),
        }
    }
}

pub struct IngressRelay {
    publisher: Arc<dyn BusPublisher>,
    publish_timeout: Duration,
}

impl IngressRelay {
    #[must_use]
    pub fn new(publisher: Arc<dyn BusPublisher>) -> Self {
        Self::with_timeout(publisher, PUBLISH_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(publisher: Arc<dyn BusPublisher>, publish_timeout: Duration) -> Self {
        Self {
            publisher,
            publish_timeout,
        }
    }

    /// Decode, validate and publish one request body.
    ///
    /// `body` is `Err` when the transport could not produce the raw bytes.
    /// Exactly one publish is attempted, and only for a valid message.
    #[tracing::instrument(level = "info", skip_all, fields(correlation_id = %correlation_id))]
    pub async fn handle(
        &self,
        correlation_id: &str,
        body: Result<Vec<u8>, RelayError>,
    ) -> IngressOutcome {
        let outcome = self.relay(body).await;
        match &outcome {
            IngressOutcome::Accepted { message_id } => {
                info!(message_id = %message_id, "Message published");
            }
            IngressOutcome::Rejected(e) => error!("Rejected inbound message: {}", e),
            IngressOutcome::UpstreamFailure(e) => error!("Publish not confirmed: {}", e),
        }
        outcome
    }

    async fn relay(&self, body: Result<Vec<u8>, RelayError>) -> IngressOutcome {
        let message = match body
            .and_then(|raw| Message::decode(&raw))
            .and_then(|msg| msg.validate().map(|()| msg))
        {
            Ok(msg) => msg,
            Err(e) => return IngressOutcome::Rejected(e),
        };

        let payload = match message.encode() {
            Ok(p) => p,
            Err(e) => return IngressOutcome::Rejected(e),
        };

        match publish_with_timeout(self.publisher.as_ref(), &payload, self.publish_timeout).await {
            Ok(message_id) => IngressOutcome::Accepted { message_id },
            Err(e) => IngressOutcome::UpstreamFailure(e),
        }
    }
}
