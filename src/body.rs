//! Request body decoding shared by the relay handlers.
//!
//! Bodies are only parsed when the request declares a JSON content type. Anything
//! else (no header, `text/plain`, a form) is treated as an empty object, so the
//! endpoint's own field validation decides the response.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use http::{header, HeaderMap};
use serde_json::{Map, Value};

use crate::error::RelayError;

/// `application/json` or any `application/*+json` type, parameters ignored.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(ct) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = ct
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Decode the request body for field validation.
///
/// Non-JSON requests and empty JSON bodies yield `{}`. Read failures (including the
/// size ceiling) and syntax errors are reported only for JSON requests.
pub fn json_or_empty(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Value, RelayError> {
    if !is_json_content_type(headers) {
        return Ok(Value::Object(Map::new()));
    }
    let bytes = body?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(&bytes)?)
}
