//! Mapping of HTTP client failures onto [`ResourceError`].

use depot_http::HttpError;
use http::StatusCode;
use resources_sdk::ResourceError;
use serde_json::Value;

/// Classify a client error. Anything that happened without a server answer
/// is `NetworkUnavailable`; a non-2xx answer is `ServerRejected`; an answer we
/// could not read is `MalformedResponse`.
#[must_use]
pub fn map_http_error(err: HttpError) -> ResourceError {
    match err {
        HttpError::HttpStatus {
            status,
            body_preview,
            ..
        } => ResourceError::rejected(status.as_u16(), rejection_message(status, &body_preview)),
        HttpError::Json(e) => ResourceError::malformed(e.to_string()),
        err @ HttpError::BodyTooLarge { .. } => ResourceError::malformed(err.to_string()),
        other => ResourceError::network(other.to_string()),
    }
}

/// Message of a rejection: the backend's `message` (or `error`) member when
/// the body is JSON, else the body text, else the status reason.
#[must_use]
pub fn rejection_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(msg)) = map.get(key)
                && !msg.trim().is_empty()
            {
                return msg.trim().to_owned();
            }
        }
    }
    if !body.is_empty() {
        return body.to_owned();
    }
    status
        .canonical_reason()
        .unwrap_or("request rejected")
        .to_owned()
}
