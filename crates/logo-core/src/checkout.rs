//! # Checkout Types
//!
//! Hosted checkout requests, sessions, and payment webhook events.

use crate::order::CustomerDetails;
use crate::product::{logo_product_name, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A request for a hosted checkout of one logo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoCheckout {
    /// Customer the logo is for
    pub customer: CustomerDetails,

    /// Line item name shown on the payment page
    pub product_name: String,

    /// Unit price (quantity is always 1)
    pub price: Price,

    /// Idempotency key for the create call
    pub idempotency_key: String,

    /// Metadata attached to the provider session
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl LogoCheckout {
    /// Build the fixed-price checkout for a customer
    pub fn for_customer(customer: CustomerDetails) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("name".to_string(), customer.name.clone());
        metadata.insert("email".to_string(), customer.email.clone());

        Self {
            product_name: logo_product_name(&customer.name),
            customer,
            price: Price::logo(),
            idempotency_key: Uuid::new_v4().to_string(),
            metadata,
        }
    }
}

/// Status of a checkout session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// Session created, awaiting payment
    #[default]
    Open,
    /// Checkout flow finished
    Complete,
    /// Session expired
    Expired,
}

/// Payment state of a checkout session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
    NoPaymentRequired,
}

/// A checkout session created by the payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// URL to redirect customer to for payment
    pub checkout_url: Option<String>,

    /// Session status
    #[serde(default)]
    pub status: CheckoutStatus,

    /// Payment status
    #[serde(default)]
    pub payment_status: PaymentStatus,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Metadata echoed back by the provider
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn new(session_id: impl Into<String>, checkout_url: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            checkout_url: Some(checkout_url.into()),
            status: CheckoutStatus::Open,
            payment_status: PaymentStatus::Unpaid,
            expires_at: None,
            metadata: HashMap::new(),
        }
    }

    /// True once the provider reports the payment as collected
    pub fn is_paid(&self) -> bool {
        matches!(
            self.payment_status,
            PaymentStatus::Paid | PaymentStatus::NoPaymentRequired
        )
    }
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Checkout session completed
    CheckoutCompleted,
    /// Checkout session expired unpaid
    CheckoutExpired,
    /// Payment failed
    PaymentFailed,
    /// Unknown event (passthrough)
    Unknown(String),
}

/// A verified, parsed webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Related session ID (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Customer email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Amount paid (in smallest unit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<i64>,

    /// Session metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}
