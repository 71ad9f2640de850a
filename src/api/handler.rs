//! API Lambda handler - thin adapter between API Gateway and the ingress relay.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::helpers;
use super::ingress::IngressRelay;

/// Lambda handler for the API entrypoint.
///
/// The response is produced only after the bus has acknowledged (or failed to
/// acknowledge) the publish.
///
/// # Errors
///
/// Never fails at the Lambda level; every outcome is rendered as an HTTP
/// status and body.
pub async fn function_handler(
    relay: &IngressRelay,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let correlation_id = event
        .payload
        .pointer("/requestContext/requestId")
        .and_then(Value::as_str)
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);
    info!(correlation_id = %correlation_id, lambda_request_id = %event.context.request_id, "API Lambda received request");

    let body = helpers::extract_body(&event.payload);
    let outcome = relay.handle(&correlation_id, body).await;

    Ok(helpers::outcome_response(&outcome))
}

pub use self::function_handler as handler;
