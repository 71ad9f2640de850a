use anyhow::Context;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use slack_relay::api::{IngressRelay, SqsPublisher};
use slack_relay::core::config::AppConfig;
use std::sync::Arc;
use tracing::debug;

async fn bootstrap() -> anyhow::Result<IngressRelay> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    slack_relay::setup_logging(&config.log_level)?;
    debug!(project_id = %config.project_id, topic_id = %config.topic_id, "Loaded configuration");

    let publisher = SqsPublisher::connect(&config)
        .await
        .context("Failed to initialize SQS publisher")?;
    Ok(IngressRelay::new(Arc::new(publisher)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let relay = Arc::new(bootstrap().await?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let relay = Arc::clone(&relay);
        async move { slack_relay::api::handler(&relay, event).await }
    }))
    .await
}
