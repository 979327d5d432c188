//! # logo-api
//!
//! HTTP API layer for logo-shop-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Storefront endpoints for checkout and logo generation
//! - Token-protected admin order listing
//! - Webhook handler for payment events
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/admin/login` | Exchange admin password for a token |
//! | GET | `/admin/orders` | List orders (Bearer token) |
//! | POST | `/create-checkout-session` | Create checkout session |
//! | POST | `/generate-logo` | Generate, store and email a logo |
//! | POST | `/webhook/stripe` | Stripe webhook |

pub mod auth;
pub mod checkout;
pub mod fulfillment;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AdminAuth, AdminUser, Claims};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
