//! Remote endpoint configuration
//!
//! Holds the base address, TLS-verification flag and optional bearer token for
//! one remote agent service. Immutable after construction.

use crate::error::{Result, TetherError};

/// Validated endpoint configuration for a remote agent service.
///
/// The base URL never carries a trailing slash, so request URLs can be built
/// by plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentEndpoint {
    base_url: String,
    verify_ssl: bool,
    auth_token: Option<String>,
}

impl AgentEndpoint {
    /// Create an endpoint from raw configuration values.
    ///
    /// Fails with a Config error when the base address is empty. Trailing
    /// slashes are stripped.
    pub fn new(base_url: &str, verify_ssl: bool, auth_token: Option<String>) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(TetherError::Config(
                "remote agent base URL is required".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            verify_ssl,
            auth_token,
        })
    }

    /// Normalized base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether TLS certificates are verified
    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Bearer token, if configured
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Build a request URL for the given path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let endpoint = AgentEndpoint::new("http://x/", true, None).unwrap();
        assert_eq!(endpoint.base_url(), "http://x");
        assert_eq!(endpoint.url("chat"), "http://x/chat");
    }

    #[test]
    fn test_endpoint_strips_multiple_trailing_slashes() {
        let endpoint = AgentEndpoint::new("http://localhost:8000///", true, None).unwrap();
        assert_eq!(endpoint.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_endpoint_empty_base_url_rejected() {
        let result = AgentEndpoint::new("", true, None);
        assert!(matches!(result, Err(TetherError::Config(_))));

        let result = AgentEndpoint::new("   ", true, None);
        assert!(matches!(result, Err(TetherError::Config(_))));
    }

    #[test]
    fn test_endpoint_url_building() {
        let endpoint = AgentEndpoint::new("https://agents.example.com", true, None).unwrap();
        assert_eq!(endpoint.url("health"), "https://agents.example.com/health");
        assert_eq!(
            endpoint.url("chat/stream"),
            "https://agents.example.com/chat/stream"
        );
        // Leading slash on the path does not double up
        assert_eq!(endpoint.url("/chat"), "https://agents.example.com/chat");
    }

    #[test]
    fn test_endpoint_holds_auth_token() {
        let endpoint =
            AgentEndpoint::new("http://x", false, Some("secret-token".to_string())).unwrap();
        assert_eq!(endpoint.auth_token(), Some("secret-token"));
        assert!(!endpoint.verify_ssl());
    }

    #[test]
    fn test_endpoint_without_auth_token() {
        let endpoint = AgentEndpoint::new("http://x", true, None).unwrap();
        assert!(endpoint.auth_token().is_none());
        assert!(endpoint.verify_ssl());
    }
}
