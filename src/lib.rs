/// Slack relay - buffers Slack webhook messages through SQS.
///
/// This crate implements a two-Lambda architecture:
/// 1. An API Lambda that validates an inbound Slack message and publishes it to SQS
/// 2. A Worker Lambda that consumes queued messages and posts them to a Slack incoming webhook
///
/// The API Lambda answers only after SQS has acknowledged the publish, so a
/// `200` means the message is durably queued. The Worker reports failed
/// records back to SQS, which redelivers them per the queue's redrive policy.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slack_relay::api::{IngressOutcome, IngressRelay, SqsPublisher};
/// use slack_relay::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AppConfig::from_env()?;
///     slack_relay::setup_logging(&config.log_level)?;
///
///     let publisher = SqsPublisher::connect(&config).await?;
///     let relay = IngressRelay::new(Arc::new(publisher));
///
///     let body = br#"{"username":"deploy-bot","text":"v1.2.3 is live"}"#.to_vec();
///     match relay.handle("demo", Ok(body)).await {
///         IngressOutcome::Accepted { message_id } => println!("queued as {message_id}"),
///         other => println!("{}: {}", other.status_code(), other.detail()),
///     }
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod slack;
pub mod worker;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// `level` is one of `off`, `error`, `warn`, `info`, `debug` or `trace`.
/// The logrus names `warning`, `fatal` and `panic` are accepted as aliases.
/// Calling this more than once keeps the first subscriber.
///
/// # Errors
///
/// Returns [`RelayError::Config`] if `level` is not a known level.
///
/// # Example
///
/// ```
/// slack_relay::setup_logging("info").unwrap();
/// ```
pub fn setup_logging(level: &str) -> Result<(), RelayError> {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::prelude::*;

    let directive = match level.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "fatal" | "panic" => "error".to_string(),
        other => other.to_string(),
    };
    let filter: LevelFilter = directive
        .parse()
        .map_err(|e| RelayError::Config(format!("LOG_LEVEL {level}: {e}")))?;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
    Ok(())
}
