//! Response builders and request-body extraction for the API Lambda.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use super::ingress::IngressOutcome;
use crate::errors::RelayError;

/// Returns a plain-text response with the given status code.
#[must_use]
pub fn text_response(status_code: u16, text: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "text/plain; charset=utf-8" },
        "body": text
    })
}

/// Renders an ingress outcome as an API Gateway proxy response.
#[must_use]
pub fn outcome_response(outcome: &IngressOutcome) -> Value {
    text_response(outcome.status_code(), &outcome.detail())
}

/// Pulls the raw request bytes out of an API Gateway proxy event.
///
/// # Errors
///
/// Returns [`RelayError::UnreadableBody`] when the body is missing, not a
/// string, or flagged as base64 but not decodable to UTF-8 text.
pub fn extract_body(payload: &Value) -> Result<Vec<u8>, RelayError> {
    let Some(body) = payload.get("body") else {
        return Err(RelayError::UnreadableBody("missing body".to_string()));
    };

    let Some(body_str) = body.as_str() else {
        return Err(RelayError::UnreadableBody("body is not a string".to_string()));
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if is_base64 {
        let raw = STANDARD
            .decode(body_str)
            .map_err(|e| RelayError::UnreadableBody(format!("invalid base64 body: {e}")))?;
        String::from_utf8(raw)
            .map(String::into_bytes)
            .map_err(|e| RelayError::UnreadableBody(format!("body is not UTF-8: {e}")))
    } else {
        Ok(body_str.as_bytes().to_vec())
    }
}
