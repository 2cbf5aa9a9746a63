//! Credential configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials for one MKDX feed
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// API key sent as `x-api-key`
    #[serde(default)]
    pub api_key: String,

    /// Feed the key has access to
    #[serde(default)]
    pub feed_id: String,
}

impl AuthConfig {
    /// Create credentials from a key and feed id
    pub fn new(api_key: impl Into<String>, feed_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            feed_id: feed_id.into(),
        }
    }

    /// Check if both the key and the feed are set
    ///
    /// # Returns
    ///
    /// `true` if neither field is blank, `false` otherwise
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.feed_id.trim().is_empty()
    }

    /// Key with everything but the last four characters masked
    #[must_use]
    pub fn masked_key(&self) -> String {
        let count = self.api_key.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = self.api_key.chars().skip(count - 4).collect();
        format!("{}{tail}", "*".repeat(count - 4))
    }

    /// Clear credential data
    pub fn clear(&mut self) {
        self.api_key.clear();
        self.feed_id.clear();
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.masked_key())
            .field("feed_id", &self.feed_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated() {
        let auth = AuthConfig::new("abc123", "feed-1");
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_not_authenticated() {
        assert!(!AuthConfig::default().is_authenticated());
        assert!(!AuthConfig::new("abc123", "  ").is_authenticated());
    }

    #[test]
    fn test_debug_masks_key() {
        let auth = AuthConfig::new("supersecret-9f2a", "feed-1");
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("9f2a"));
    }

    #[test]
    fn test_clear() {
        let mut auth = AuthConfig::new("abc123", "feed-1");
        auth.clear();
        assert_eq!(auth, AuthConfig::default());
    }
}
