//! # Email Configuration

use std::time::Duration;

/// Default SMTP relay.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for SMTP delivery
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// Sender address, also used as the SMTP login.
    pub from_address: String,
    /// SMTP password.
    pub password: Option<String>,
    /// Timeout for the SMTP session and the image download.
    pub timeout: Option<Duration>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `EMAIL_FROM` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable     | Required | Default          |
    /// |--------------|----------|------------------|
    /// | `EMAIL_FROM` | yes      | -                |
    /// | `EMAIL_PASS` | no       | -                |
    /// | `SMTP_HOST`  | no       | `smtp.gmail.com` |
    /// | `SMTP_PORT`  | no       | `587`            |
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, e.g. a map in tests.
    pub fn from_vars<F>(var: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_address = var("EMAIL_FROM").filter(|s| !s.is_empty())?;
        Some(Self {
            smtp_host: var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: var("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address,
            password: var("EMAIL_PASS"),
            timeout: None,
        })
    }

    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: from_address.into(),
            password: None,
            timeout: None,
        }
    }

    /// Builder: set the outbound timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Option<EmailConfig> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        EmailConfig::from_vars(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn none_without_sender() {
        assert!(from_map(&[]).is_none());
        assert!(from_map(&[("EMAIL_FROM", ""), ("EMAIL_PASS", "pw")]).is_none());
    }

    #[test]
    fn reads_relay_settings() {
        let config = from_map(&[
            ("EMAIL_FROM", "shop@example.com"),
            ("EMAIL_PASS", "app-password"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
        ])
        .unwrap();

        assert_eq!(config.from_address, "shop@example.com");
        assert_eq!(config.password.as_deref(), Some("app-password"));
        assert_eq!(config.smtp_host, "smtp.example.com");
        assert_eq!(config.smtp_port, 2525);
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let config =
            from_map(&[("EMAIL_FROM", "shop@example.com"), ("SMTP_PORT", "smtp")]).unwrap();
        assert_eq!(config.smtp_port, 587);
    }

    #[test]
    fn new_uses_gmail_starttls_defaults() {
        let config = EmailConfig::new("shop@example.com");
        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 587);
    }
}
