//! Header construction for outbound archive requests.

use base64::Engine;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};

use crate::config::OrthancConfig;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Builds the header set for one outbound request: content type, exact
/// byte length of the payload when one is present, and the fixed Basic
/// credential. Pure construction, no per-request credential override.
pub fn build(auth: &OrthancConfig, payload: Option<&[u8]>, content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Some(body) = payload {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    }
    headers.insert(AUTHORIZATION, basic_credential(auth));
    headers
}

/// `Basic base64(username:password)` for the configured archive account.
pub fn basic_credential(auth: &OrthancConfig) -> HeaderValue {
    let token = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", auth.username, auth.password));
    HeaderValue::from_str(&format!("Basic {token}"))
        .expect("base64 output is always a valid header value")
}
