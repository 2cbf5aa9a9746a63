//! HTTP transport construction

use crate::config::DEFAULT_CONNECT_TIMEOUT_SECS;
use crate::error::{MkdxError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "x-api-key";

/// Create the HTTP client used for every request of one [`Client`](super::Client)
///
/// The API key and `accept: application/json` are installed as default
/// headers so individual requests cannot forget them. The key header is
/// marked sensitive so it never shows up in reqwest's debug output.
///
/// # Errors
///
/// Returns `InvalidArgument` if the key is not a valid header value, or
/// `Internal` if the client cannot be built.
pub fn build_http_client(api_key: &str, timeout: Duration) -> Result<reqwest::Client> {
    let mut key = HeaderValue::from_str(api_key).map_err(|_| {
        MkdxError::InvalidArgument("API key contains characters not allowed in a header".to_string())
    })?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let _ = headers.insert(API_KEY_HEADER, key);

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!("mkdx/", env!("CARGO_PKG_VERSION")))
        .tcp_nodelay(true)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS).min(timeout))
        .build()
        .map_err(|e| MkdxError::Internal(format!("Failed to create HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_key_with_newline() {
        let err = build_http_client("abc\ndef", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, MkdxError::InvalidArgument(_)));
    }

    #[test]
    fn test_builds_with_plain_key() {
        assert!(build_http_client("abc123", Duration::from_secs(5)).is_ok());
    }
}
