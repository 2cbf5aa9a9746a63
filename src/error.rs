//! Error types and handling for the MKDX client
//!
//! Every failure the client can hit maps to one variant here, so callers can
//! tell an authentication rejection apart from an unknown stream or a dropped
//! connection without parsing messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for MKDX client operations
pub type Result<T> = std::result::Result<T, MkdxError>;

/// Error types for MKDX client operations
#[derive(Error, Debug)]
pub enum MkdxError {
    // ═══════════════════════════════════════════════════════════════
    // Network & HTTP Errors
    // ═══════════════════════════════════════════════════════════════
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to connect to the MKDX service
    #[error("Failed to connect to {host}: {reason}")]
    ConnectionError { host: String, reason: String },

    /// Request timed out
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Non-success response the client has no dedicated variant for
    #[error("MKDX API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not the JSON the client expected
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════
    // Authentication & Authorization
    // ═══════════════════════════════════════════════════════════════
    /// The service rejected the API key
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// No API key or feed id configured
    #[error("Missing credentials: {0}. Run 'mkdx configure' or set MKDX_API_KEY / MKDX_FEED_ID")]
    MissingCredentials(String),

    // ═══════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════
    /// Feed or stream unknown to the service
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ═══════════════════════════════════════════════════════════════
    // Configuration & File Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// Failed to write configuration file
    #[error("Failed to write config to {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    /// Directory operation failed
    #[error("Directory operation failed: {path}: {reason}")]
    DirError { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file not found
    #[error("Configuration not found. Run 'mkdx configure' to set up credentials")]
    NoConfig,

    // ═══════════════════════════════════════════════════════════════
    // Validation & Encoding
    // ═══════════════════════════════════════════════════════════════
    /// Invalid input argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to serialize data
    #[error("Serialization failed: {0}")]
    SerializationError(String),

    /// Writing output failed
    #[error("Output failed: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MkdxError {
    /// Get the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredentials(_) | Self::NoConfig => 1,
            Self::InvalidArgument(_) => 2,
            Self::AuthFailed(_) => 3,
            Self::ConnectionError { .. } | Self::Http(_) => 4,
            Self::NotFound { .. } => 5,
            Self::ApiError { .. } | Self::InvalidResponse(_) => 6,
            Self::Timeout(_) => 124,
            _ => 1,
        }
    }

    /// Whether a caller could reasonably retry.
    ///
    /// The client itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError { .. } | Self::Http(_) | Self::Timeout(_) => true,
            Self::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True for authentication or authorization rejections
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::AuthFailed(_) | Self::MissingCredentials(_))
    }

    /// True when the service did not recognise the feed or stream
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for MkdxError {
    fn from(err: reqwest::Error) -> Self {
        let host = err
            .url()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| "<unknown>".to_string());

        if err.is_timeout() {
            Self::Timeout(format!("request to {host} timed out"))
        } else if err.is_connect() {
            Self::ConnectionError {
                host,
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MkdxError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            Self::InvalidResponse(format!("JSON syntax error: {err}"))
        } else {
            Self::SerializationError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let auth = MkdxError::AuthFailed("bad key".to_string());
        let missing = MkdxError::NotFound {
            resource: "stream 100".to_string(),
        };
        let net = MkdxError::ConnectionError {
            host: "api.mkdx.btcsp.co.uk".to_string(),
            reason: "refused".to_string(),
        };

        assert_eq!(auth.exit_code(), 3);
        assert_eq!(missing.exit_code(), 5);
        assert_eq!(net.exit_code(), 4);
    }

    #[test]
    fn test_predicates() {
        assert!(MkdxError::AuthFailed(String::new()).is_auth());
        assert!(!MkdxError::AuthFailed(String::new()).is_not_found());
        assert!(MkdxError::NotFound {
            resource: "feed".to_string()
        }
        .is_not_found());
    }

    #[test]
    fn test_retryable() {
        assert!(MkdxError::Timeout("slow".to_string()).is_retryable());
        assert!(MkdxError::ApiError {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!MkdxError::ApiError {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!MkdxError::AuthFailed(String::new()).is_retryable());
    }

    #[test]
    fn test_json_syntax_error_is_invalid_response() {
        let err: MkdxError = serde_json::from_str::<serde_json::Value>("{not json")
            .map_err(MkdxError::from)
            .unwrap_err();
        assert!(matches!(err, MkdxError::InvalidResponse(_)));
    }
}
