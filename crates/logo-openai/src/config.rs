//! # OpenAI Configuration

use logo_core::{LogoError, LOGO_IMAGE_SIZE};
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";

/// Only `dall-e-2` accepts the 512x512 size the shop sells.
const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";

/// OpenAI Images API configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Secret API key
    pub api_key: String,

    /// Image model name
    pub model: String,

    /// Requested image size
    pub size: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl OpenAiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default    |
    /// |----------------------|----------|------------|
    /// | `OPENAI_API_KEY`     | yes      | -          |
    /// | `OPENAI_IMAGE_MODEL` | no       | `dall-e-2` |
    pub fn from_env() -> Result<Self, LogoError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, e.g. a map in tests.
    pub fn from_vars<F>(var: F) -> Result<Self, LogoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LogoError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(model) = var("OPENAI_IMAGE_MODEL").filter(|m| !m.is_empty()) {
            config.model = model;
        }
        Ok(config)
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            size: LOGO_IMAGE_SIZE.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
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

    fn from_map(vars: &[(&str, &str)]) -> Result<OpenAiConfig, LogoError> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        OpenAiConfig::from_vars(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = OpenAiConfig::new("sk-abc");
        assert_eq!(config.model, "dall-e-2");
        assert_eq!(config.size, "512x512");
        assert_eq!(config.auth_header(), "Bearer sk-abc");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_missing_or_empty_key() {
        assert!(from_map(&[]).is_err());
        assert!(from_map(&[("OPENAI_API_KEY", "")]).is_err());
    }

    #[test]
    fn test_model_override() {
        let config = from_map(&[
            ("OPENAI_API_KEY", "sk-abc"),
            ("OPENAI_IMAGE_MODEL", "dall-e-3"),
        ])
        .unwrap();
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.model, "dall-e-3");

        let config = from_map(&[("OPENAI_API_KEY", "sk-abc")]).unwrap();
        assert_eq!(config.model, "dall-e-2");
    }
}
