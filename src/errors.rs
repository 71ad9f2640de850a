use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to read request body: {0}")]
    UnreadableBody(String),

    #[error("Failed to read message from body: {0}")]
    Decode(String),

    #[error("Invalid message: {0}")]
    Validation(String),

    #[error("Failed to publish: {0}")]
    Publish(String),

    #[error("Failed to submit to Slack: {0}")]
    Submit(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Whether resubmitting the same message may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Publish(_) | RelayError::Submit(_))
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::Decode(error.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::Submit(error.to_string())
    }
}

// Generic implementation for AWS SDK errors
impl<E> From<aws_sdk_sqs::error::SdkError<E>> for RelayError
where
    E: std::error::Error + 'static,
{
    fn from(error: aws_sdk_sqs::error::SdkError<E>) -> Self {
        RelayError::Publish(aws_sdk_sqs::error::DisplayErrorContext(error).to_string())
    }
}
