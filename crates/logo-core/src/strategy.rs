//! # Provider Traits
//!
//! Seams between the HTTP layer and the external services it calls.
//!
//! ```text
//!   create-checkout-session          generate-logo              admin/orders
//!            │                             │                         │
//!            ▼                             ▼                         ▼
//!   ┌─────────────────┐   ┌────────────────┐  ┌────────────┐  ┌────────────┐
//!   │ PaymentStrategy │   │ ImageGenerator │─▶│ OrderStore │◀─│   (list)   │
//!   │    (Stripe)     │   │    (OpenAI)    │  │  (SQLite)  │  └────────────┘
//!   └─────────────────┘   └────────────────┘  └─────┬──────┘
//!                                                   ▼
//!                                             ┌────────────┐
//!                                             │   Mailer   │
//!                                             │   (SMTP)   │
//!                                             └────────────┘
//! ```
//!
//! Each implementation lives in its own crate; handlers only see these traits,
//! so tests swap in in-process mocks.

use crate::checkout::{CheckoutSession, LogoCheckout, WebhookEvent};
use crate::error::LogoResult;
use crate::order::{GeneratedImage, NewOrder, Order};
use async_trait::async_trait;
use std::sync::Arc;

/// Hosted-checkout payment provider.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted checkout session and return it with its redirect URL.
    async fn create_checkout(
        &self,
        checkout: &LogoCheckout,
        success_url: &str,
        cancel_url: &str,
    ) -> LogoResult<CheckoutSession>;

    /// Look up an existing session, including its payment status.
    async fn retrieve_checkout(&self, session_id: &str) -> LogoResult<CheckoutSession>;

    /// Verify a webhook signature and parse the event.
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> LogoResult<WebhookEvent>;

    /// Get the provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;
}

/// Generative image provider.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for the prompt and return its hosted URL.
    async fn generate(&self, prompt: &str) -> LogoResult<GeneratedImage>;

    fn provider_name(&self) -> &'static str;
}

/// Append-only order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order, returning it with its assigned id and timestamp.
    async fn insert(&self, order: NewOrder) -> LogoResult<Order>;

    /// All orders, newest first.
    async fn list(&self) -> LogoResult<Vec<Order>>;
}

/// Delivers a finished logo to the customer.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_logo(&self, order: &Order) -> LogoResult<()>;
}

pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;
pub type BoxedImageGenerator = Arc<dyn ImageGenerator>;
pub type BoxedOrderStore = Arc<dyn OrderStore>;
pub type BoxedMailer = Arc<dyn Mailer>;
