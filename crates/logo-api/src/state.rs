//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the provider strategies, admin auth and configuration.

use crate::auth::AdminAuth;
use crate::checkout::CheckoutUrls;
use logo_core::{
    BoxedImageGenerator, BoxedMailer, BoxedOrderStore, BoxedPaymentStrategy, LogoError,
    LogoResult,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Frontend origin used for checkout redirects
    pub domain_url: String,
    /// sqlx connection string
    pub database_url: String,
    /// Require a paid checkout session before generating a logo
    pub require_paid_checkout: bool,
    /// Timeout for outbound provider calls; `None` waits indefinitely
    pub outbound_timeout: Option<Duration>,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; unset or unparseable values keep their defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            domain_url: var("DOMAIN_URL").unwrap_or(defaults.domain_url),
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            require_paid_checkout: var("REQUIRE_PAID_CHECKOUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.require_paid_checkout),
            outbound_timeout: var("OUTBOUND_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            cors_origins: var("CORS_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> LogoResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| LogoError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            domain_url: "http://localhost:3000".to_string(),
            database_url: logo_db::DEFAULT_DATABASE_URL.to_string(),
            require_paid_checkout: false,
            outbound_timeout: None,
            cors_origins: Vec::new(),
            environment: "development".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout provider
    pub payments: BoxedPaymentStrategy,
    /// Image generation provider
    pub images: BoxedImageGenerator,
    /// Order persistence
    pub orders: BoxedOrderStore,
    /// Logo delivery
    pub mailer: BoxedMailer,
    /// Admin login and token checks
    pub auth: Arc<AdminAuth>,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        auth: AdminAuth,
        payments: BoxedPaymentStrategy,
        images: BoxedImageGenerator,
        orders: BoxedOrderStore,
        mailer: BoxedMailer,
    ) -> Self {
        Self {
            urls: CheckoutUrls::new(&config.domain_url),
            payments,
            images,
            orders,
            mailer,
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }
}
