//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API for the logo shop:
//! one fixed-price line item, paid by card on Stripe's hosted page.

use crate::config::StripeConfig;
use crate::webhook::{parse_event, verify_signature};
use async_trait::async_trait;
use chrono::DateTime;
use logo_core::{
    CheckoutSession, CheckoutStatus, LogoCheckout, LogoError, LogoResult, PaymentStatus,
    PaymentStrategy, WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page, so card data never touches this server.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> LogoResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            LogoError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> LogoResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build form data for the create-session call
    fn build_form(
        checkout: &LogoCheckout,
        success_url: &str,
        cancel_url: &str,
    ) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
            (
                "customer_email".to_string(),
                checkout.customer.email.clone(),
            ),
            (
                "line_items[0][price_data][currency]".to_string(),
                checkout.price.currency.as_str().to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                checkout.price.amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                checkout.product_name.clone(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];

        let mut metadata: Vec<_> = checkout.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            form_params.push((format!("metadata[{}]", key), value.clone()));
        }

        form_params
    }

    /// Read a Stripe response body, turning API errors into provider errors
    async fn read_body(response: reqwest::Response) -> LogoResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LogoError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(LogoError::provider(PROVIDER, error_response.error.message));
            }

            return Err(LogoError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        Ok(body)
    }

    fn parse_session(body: &str) -> LogoResult<CheckoutSession> {
        let session: StripeCheckoutSessionResponse = serde_json::from_str(body).map_err(|e| {
            LogoError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let status = match session.status.as_deref() {
            Some("complete") => CheckoutStatus::Complete,
            Some("expired") => CheckoutStatus::Expired,
            _ => CheckoutStatus::Open,
        };

        let payment_status = match session.payment_status.as_deref() {
            Some("paid") => PaymentStatus::Paid,
            Some("no_payment_required") => PaymentStatus::NoPaymentRequired,
            _ => PaymentStatus::Unpaid,
        };

        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url: session.url,
            status,
            payment_status,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            metadata: session.metadata,
        })
    }
}

/// Stripe ids are `cs_test_...` style tokens; anything else never reaches the URL path.
fn validate_session_id(session_id: &str) -> LogoResult<()> {
    let valid = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(LogoError::InvalidRequest(format!(
            "Malformed checkout session id: {}",
            session_id
        )))
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, checkout), fields(customer = %checkout.customer.email))]
    async fn create_checkout(
        &self,
        checkout: &LogoCheckout,
        success_url: &str,
        cancel_url: &str,
    ) -> LogoResult<CheckoutSession> {
        let form_params = Self::build_form(checkout, success_url, cancel_url);

        debug!(
            "Creating Stripe checkout session: amount={}",
            checkout.price.display()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &checkout.idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| LogoError::NetworkError(e.to_string()))?;

        let body = Self::read_body(response).await?;
        let session = Self::parse_session(&body)?;

        if session.checkout_url.is_none() {
            return Err(LogoError::provider(
                PROVIDER,
                "Checkout session has no redirect URL",
            ));
        }

        info!("Created Stripe checkout session: id={}", session.session_id);

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn retrieve_checkout(&self, session_id: &str) -> LogoResult<CheckoutSession> {
        validate_session_id(session_id)?;

        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, session_id
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| LogoError::NetworkError(e.to_string()))?;

        let body = Self::read_body(response).await?;
        let session = Self::parse_session(&body)?;

        debug!(
            "Retrieved Stripe checkout session: id={}, payment_status={:?}",
            session.session_id, session.payment_status
        );

        Ok(session)
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> LogoResult<WebhookEvent> {
        let secret = self.config.webhook_secret.as_deref().ok_or_else(|| {
            LogoError::Configuration("STRIPE_WEBHOOK_SECRET not set".to_string())
        })?;

        verify_signature(secret, payload, signature, chrono::Utc::now().timestamp())?;
        parse_event(payload)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
