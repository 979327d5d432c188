//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.

use logo_core::LogoError;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook signing secret (whsec_...), if webhooks are enabled
    pub webhook_secret: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    ///
    /// Optional:
    /// - `STRIPE_WEBHOOK_SECRET`
    pub fn from_env() -> Result<Self, LogoError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, e.g. a map in tests.
    pub fn from_vars<F>(var: F) -> Result<Self, LogoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = var("STRIPE_SECRET_KEY").ok_or_else(|| {
            LogoError::Configuration("STRIPE_SECRET_KEY not set".to_string())
        })?;

        if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
            return Err(LogoError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        let webhook_secret = var("STRIPE_WEBHOOK_SECRET").filter(|s| !s.is_empty());

        if let Some(ref secret) = webhook_secret {
            if !secret.starts_with("whsec_") {
                return Err(LogoError::Configuration(
                    "STRIPE_WEBHOOK_SECRET must start with whsec_".to_string(),
                ));
            }
        }

        Ok(Self {
            webhook_secret,
            ..Self::new(secret_key)
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: None,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set the webhook signing secret
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Builder: set the outbound request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<StripeConfig, LogoError> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        StripeConfig::from_vars(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_test_mode_detection() {
        assert!(StripeConfig::new("sk_test_abc123").is_test_mode());
        assert!(!StripeConfig::new("sk_live_abc123").is_test_mode());
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_builders() {
        let config = StripeConfig::new("sk_test_abc123")
            .with_api_base_url("http://127.0.0.1:9999")
            .with_webhook_secret("whsec_test")
            .with_timeout(Some(Duration::from_secs(5)));

        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.webhook_secret.as_deref(), Some("whsec_test"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(from_map(&[]), Err(LogoError::Configuration(_))));
    }

    #[test]
    fn test_key_prefix_checked() {
        assert!(from_map(&[("STRIPE_SECRET_KEY", "pk_test_abc")]).is_err());

        let config = from_map(&[("STRIPE_SECRET_KEY", "sk_live_abc")]).unwrap();
        assert!(!config.is_test_mode());
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_webhook_secret() {
        let config = from_map(&[
            ("STRIPE_SECRET_KEY", "sk_test_abc"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_abc"),
        ])
        .unwrap();
        assert_eq!(config.webhook_secret.as_deref(), Some("whsec_abc"));

        let blank = from_map(&[
            ("STRIPE_SECRET_KEY", "sk_test_abc"),
            ("STRIPE_WEBHOOK_SECRET", ""),
        ])
        .unwrap();
        assert!(blank.webhook_secret.is_none());

        assert!(from_map(&[
            ("STRIPE_SECRET_KEY", "sk_test_abc"),
            ("STRIPE_WEBHOOK_SECRET", "secret"),
        ])
        .is_err());
    }
}
