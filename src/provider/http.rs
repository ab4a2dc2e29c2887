//! Shared HTTP client and response utilities for the cloud providers.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::error::ParlaError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// No overall request timeout is set: a hung request delays fallback rather
/// than aborting it.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// JSON headers with one provider-specific API-key header.
pub fn api_key_headers(header_name: &'static str, api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(api_key) {
        headers.insert(header_name, val);
    }
    headers
}

/// Map a non-2xx HTTP status to an error, surfacing the human-readable
/// message when the body is a structured JSON error payload.
pub fn status_to_error(status: u16, body: &str) -> ParlaError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    ParlaError::api(status, message)
}

/// Pull `error.message` (Google style) or `detail.message` (ElevenLabs
/// style) out of a JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "detail"].iter().find_map(|key| {
        parsed
            .get(key)?
            .get("message")?
            .as_str()
            .map(ToString::to_string)
    })
}

pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}
