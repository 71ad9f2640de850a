use std::sync::Arc;
use tracing::{error, info};

use crate::core::models::Message;
use crate::errors::RelayError;
use crate::slack::MessageSink;

/// Egress relay: re-validate a bus message and forward it to Slack.
///
/// Deliveries are not deduplicated. A redelivered message is submitted again.
pub struct EgressRelay {
    sink: Arc<dyn MessageSink>,
}

impl EgressRelay {
    #[must_use]
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }

    /// Process one delivered payload. `Err` asks the bus to redeliver.
    ///
    /// # Errors
    ///
    /// Returns the decode, validation or submission failure unchanged.
    #[tracing::instrument(level = "info", skip(self, raw))]
    pub async fn on_bus_message(&self, bus_message_id: &str, raw: &[u8]) -> Result<(), RelayError> {
        let result = self.forward(raw).await;
        match &result {
            Ok(()) => info!("Forwarded message to Slack"),
            Err(e) => error!(payload_len = raw.len(), "Error forwarding message: {}", e),
        }
        result
    }

    async fn forward(&self, raw: &[u8]) -> Result<(), RelayError> {
        let message = Message::decode(raw)?;
        message.validate()?;
        self.sink.submit(&message).await
    }
}
