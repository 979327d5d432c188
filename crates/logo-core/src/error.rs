//! # Error Types
//!
//! Typed error handling for the logo shop.
//! Every provider and store operation returns `Result<T, LogoError>`.

use thiserror::Error;

/// Core error type shared by all crates in the workspace
#[derive(Debug, Error)]
pub enum LogoError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid or missing request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Admin credentials or token rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Upstream provider (payment, image, mail) returned an error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with a provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Checkout session exists but has not been paid
    #[error("Payment not completed for session {session_id}")]
    PaymentNotCompleted { session_id: String },

    /// Order store failure
    #[error("Database error: {0}")]
    Database(String),

    /// Email could not be built or delivered
    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LogoError {
    /// Shorthand for a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        LogoError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Message to pass through to API clients for upstream failures.
    ///
    /// Provider errors expose only the provider's own message.
    pub fn provider_message(&self) -> String {
        match self {
            LogoError::ProviderError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            LogoError::Configuration(_) => 500,
            LogoError::InvalidRequest(_) => 400,
            LogoError::Unauthorized(_) => 401,
            LogoError::ProviderError { .. } => 502,
            LogoError::NetworkError(_) => 503,
            LogoError::WebhookVerificationFailed(_) => 401,
            LogoError::WebhookParseError(_) => 400,
            LogoError::PaymentNotCompleted { .. } => 402,
            LogoError::Database(_) => 500,
            LogoError::EmailDelivery(_) => 500,
            LogoError::Serialization(_) => 500,
            LogoError::Internal(_) => 500,
        }
    }
}

/// Result type alias for logo shop operations
pub type LogoResult<T> = Result<T, LogoError>;
