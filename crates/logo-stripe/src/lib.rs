//! # logo-stripe
//!
//! Stripe payment strategy for logo-shop-rs.
//!
//! [`StripeCheckoutStrategy`] implements `logo_core::PaymentStrategy` on top of
//! the Checkout Sessions API:
//! - one fixed-price card line item per session
//! - customer email prefill and name/email metadata
//! - session retrieval for payment verification
//! - webhook signature verification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use logo_core::{LogoCheckout, PaymentStrategy};
//! use logo_stripe::StripeCheckoutStrategy;
//!
//! let strategy = StripeCheckoutStrategy::from_env()?;
//! let session = strategy
//!     .create_checkout(&LogoCheckout::for_customer(customer), &success_url, &cancel_url)
//!     .await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
pub use webhook::{
    dispatch_webhook_event, sign_payload, LoggingWebhookHandler, WebhookHandler,
    REQUIRED_WEBHOOK_EVENTS,
};
