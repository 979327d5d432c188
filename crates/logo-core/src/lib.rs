//! # logo-core
//!
//! Core types and traits for the logo shop.
//!
//! This crate provides:
//! - `CustomerDetails`, `NewOrder` and `Order` for the order lifecycle
//! - `LogoCheckout` and `CheckoutSession` for the payment flow
//! - `PaymentStrategy`, `ImageGenerator`, `OrderStore` and `Mailer` traits
//!   implemented by the provider crates
//! - `LogoError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use logo_core::{logo_prompt, CustomerDetails, NewOrder};
//!
//! let customer = CustomerDetails::parse(Some("Acme"), Some("a@x.com"))?;
//! let image = generator.generate(&logo_prompt(&customer.name)).await?;
//! let order = store.insert(NewOrder::new(&customer, &image)).await?;
//! ```

pub mod checkout;
pub mod crypto;
pub mod error;
pub mod order;
pub mod product;
pub mod strategy;

// Re-exports for convenience
pub use checkout::{
    CheckoutSession, CheckoutStatus, LogoCheckout, PaymentStatus, WebhookEvent, WebhookEventType,
};
pub use crypto::constant_time_compare;
pub use error::{LogoError, LogoResult};
pub use order::{CustomerDetails, GeneratedImage, NewOrder, Order, MAX_EMAIL_LEN, MAX_NAME_LEN};
pub use product::{
    logo_product_name, logo_prompt, Currency, Price, LOGO_IMAGE_SIZE, LOGO_PRICE_CENTS,
};
pub use strategy::{
    BoxedImageGenerator, BoxedMailer, BoxedOrderStore, BoxedPaymentStrategy, ImageGenerator,
    Mailer, OrderStore, PaymentStrategy,
};
