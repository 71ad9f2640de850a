use futures::future::join_all;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::egress::EgressRelay;
use crate::errors::RelayError;

/// Lambda handler for the Worker entrypoint.
///
/// Every SQS record is relayed concurrently. Records that fail are listed in
/// `batchItemFailures` so SQS redelivers only those.
///
/// # Errors
///
/// Fails the whole invocation when a record has no `messageId`, since such a
/// record cannot be reported individually.
pub async fn function_handler(
    relay: &EgressRelay,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let records = event
        .payload
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    info!("Worker Lambda received {} SQS record(s)", records.len());

    let mut deliveries = Vec::with_capacity(records.len());
    for record in records {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::from("SQS record is missing messageId"))?;
        deliveries.push(deliver_record(relay, message_id, record));
    }

    let failures: Vec<Value> = join_all(deliveries)
        .await
        .into_iter()
        .filter_map(|(message_id, result)| {
            result
                .err()
                .map(|_| json!({ "itemIdentifier": message_id }))
        })
        .collect();

    if !failures.is_empty() {
        warn!("{} SQS record(s) will be redelivered", failures.len());
    }

    Ok(json!({ "batchItemFailures": failures }))
}

async fn deliver_record<'a>(
    relay: &EgressRelay,
    message_id: &'a str,
    record: &Value,
) -> (&'a str, Result<(), RelayError>) {
    let result = match record.get("body").and_then(Value::as_str) {
        Some(body) => relay.on_bus_message(message_id, body.as_bytes()).await,
        None => Err(RelayError::Decode("SQS record has no body".to_string())),
    };
    (message_id, result)
}

pub use self::function_handler as handler;
