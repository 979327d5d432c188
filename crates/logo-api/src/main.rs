//! # Logo Shop RS
//!
//! AI logo storefront backend.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export JWT_SECRET_KEY=...
//! export ADMIN_PASSWORD=...
//! export STRIPE_SECRET_KEY=sk_test_...
//! export OPENAI_API_KEY=sk-...
//! export EMAIL_FROM=shop@example.com
//! export EMAIL_PASS=...
//!
//! # Run the server
//! logo-shop
//! ```

use logo_api::{routes, AdminAuth, AppConfig, AppState};
use logo_core::BoxedMailer;
use logo_db::SqliteOrderStore;
use logo_mail::{EmailConfig, SmtpMailer, UnconfiguredMailer};
use logo_openai::{OpenAiConfig, OpenAiImageGenerator};
use logo_stripe::{StripeCheckoutStrategy, StripeConfig, REQUIRED_WEBHOOK_EVENTS};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Print banner
    print_banner();

    let config = AppConfig::from_env();
    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    // Database
    let pool = logo_db::create_pool(&config.database_url).await?;
    logo_db::health_check(&pool).await?;
    logo_db::run_migrations(&pool).await?;
    info!("Database ready: {}", config.database_url);

    // Providers
    let auth = AdminAuth::from_env()?;

    let stripe_config = StripeConfig::from_env()?.with_timeout(config.outbound_timeout);
    let has_webhook_secret = stripe_config.webhook_secret.is_some();
    let payments = StripeCheckoutStrategy::new(stripe_config)?;
    info!("Stripe test mode: {}", payments.config().is_test_mode());

    let images =
        OpenAiImageGenerator::new(OpenAiConfig::from_env()?.with_timeout(config.outbound_timeout))?;

    let mailer: BoxedMailer = match EmailConfig::from_env() {
        Some(email) => Arc::new(SmtpMailer::new(email.with_timeout(config.outbound_timeout))?),
        None => {
            warn!("EMAIL_FROM not set, logo emails will fail and be logged");
            Arc::new(UnconfiguredMailer)
        }
    };

    if config.require_paid_checkout {
        info!("Paid checkout required before logo generation");
    } else {
        warn!("/generate-logo does not verify payment (REQUIRE_PAID_CHECKOUT=false)");
    }

    if has_webhook_secret {
        info!("Webhook events: {}", REQUIRED_WEBHOOK_EVENTS.join(", "));
    } else {
        warn!("STRIPE_WEBHOOK_SECRET not set, /webhook/stripe will reject all events");
    }

    match config.outbound_timeout {
        Some(timeout) => info!("Outbound timeout: {:?}", timeout),
        None => info!("Outbound timeout: none"),
    }

    let state = AppState::new(
        config,
        auth,
        Arc::new(payments),
        Arc::new(images),
        Arc::new(SqliteOrderStore::new(pool)),
        mailer,
    );

    info!("Environment: {}", state.config.environment);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚀 Logo shop starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("💳 Checkout: POST http://{}/create-checkout-session", addr);
        info!("🎨 Generate: POST http://{}/generate-logo", addr);
        info!("🔔 Webhook: POST http://{}/webhook/stripe", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Text logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn print_banner() {
    println!(
        r#"
  🎨 Logo Shop RS 🎨
  ━━━━━━━━━━━━━━━━━━━━━━━
  AI logos, paid and delivered
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
