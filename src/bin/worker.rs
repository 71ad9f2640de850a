use anyhow::Context;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use slack_relay::core::config::{AppConfig, SUBMIT_TIMEOUT};
use slack_relay::slack::WebhookClient;
use slack_relay::worker::EgressRelay;
use std::sync::Arc;
use tracing::debug;

fn bootstrap() -> anyhow::Result<EgressRelay> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    slack_relay::setup_logging(&config.log_level)?;
    debug!(project_id = %config.project_id, topic_id = %config.topic_id, "Loaded configuration");

    let webhook = WebhookClient::new(config.slack_webhook_url, SUBMIT_TIMEOUT)
        .context("Failed to initialize Slack webhook client")?;
    Ok(EgressRelay::new(Arc::new(webhook)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let relay = Arc::new(bootstrap()?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let relay = Arc::clone(&relay);
        async move { slack_relay::worker::handler(&relay, event).await }
    }))
    .await
}
