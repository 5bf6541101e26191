//! Classification of archive responses into the binary/structured duality.

use axum::body::Bytes;
use http::HeaderMap;
use serde_json::Value;

/// Content types the archive serves as opaque binary payloads.
const BINARY_CONTENT_TYPES: [&str; 2] = ["application/pdf", "application/dicom"];

/// One fully-read archive response, classified by content type.
#[derive(Debug, Clone)]
pub enum UpstreamResponse {
    /// Parsed JSON, or the raw text when the body is not valid JSON.
    Structured(Value),
    /// An opaque payload with the upstream headers preserved verbatim.
    Binary { bytes: Bytes, headers: HeaderMap },
}

impl UpstreamResponse {
    /// The structured payload. A binary response collapses to `Null` and
    /// its bytes are dropped; binary endpoints belong on the streaming
    /// path, not the buffered one.
    pub fn into_structured(self) -> Value {
        match self {
            UpstreamResponse::Structured(value) => value,
            UpstreamResponse::Binary { bytes, .. } => {
                tracing::debug!(
                    dropped_bytes = bytes.len(),
                    "binary response read through the structured path"
                );
                Value::Null
            }
        }
    }
}

/// True for exactly the media types listed in `BINARY_CONTENT_TYPES`.
/// Parameters after `;` do not affect the classification.
pub fn is_binary_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    BINARY_CONTENT_TYPES
        .iter()
        .any(|binary| essence.eq_ignore_ascii_case(binary))
}

/// Parses a structured body, tolerating non-JSON text: some archive
/// endpoints answer plain text on success.
pub fn parse_structured(body: &[u8]) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(body).into_owned()),
    }
}
