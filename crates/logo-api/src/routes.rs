//! # Routes
//!
//! Axum router configuration for the logo shop API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Routes:
/// - Public:
///   - GET  /health - Health check
///   - POST /create-checkout-session - Start a hosted checkout
///   - POST /generate-logo - Generate, store and email a logo
///
/// - Admin:
///   - POST /admin/login - Exchange password for a token
///   - GET  /admin/orders - List orders (Bearer token)
///
/// - Webhooks:
///   - POST /webhook/stripe - Stripe webhook handler
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let admin_routes = Router::new()
        .route("/login", post(handlers::admin_login))
        .route("/orders", get(handlers::admin_orders));

    // Webhook routes (must accept raw body)
    let webhook_routes = Router::new().route("/stripe", post(handlers::stripe_webhook));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Storefront
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route("/generate-logo", post(handlers::generate_logo))
        // Admin
        .nest("/admin", admin_routes)
        // Webhooks
        .nest("/webhook", webhook_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

/// Any origin when none are configured, otherwise the listed origins only.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminAuth;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use logo_core::{
        CheckoutSession, GeneratedImage, ImageGenerator, LogoCheckout, LogoError, LogoResult,
        Mailer, NewOrder, Order, OrderStore, PaymentStrategy, WebhookEvent,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Unused;

    #[async_trait]
    impl PaymentStrategy for Unused {
        async fn create_checkout(
            &self,
            _: &LogoCheckout,
            _: &str,
            _: &str,
        ) -> LogoResult<CheckoutSession> {
            Err(LogoError::Internal("unused".into()))
        }
        async fn retrieve_checkout(&self, _: &str) -> LogoResult<CheckoutSession> {
            Err(LogoError::Internal("unused".into()))
        }
        async fn verify_webhook(&self, _: &[u8], _: &str) -> LogoResult<WebhookEvent> {
            Err(LogoError::Internal("unused".into()))
        }
        fn provider_name(&self) -> &'static str {
            "unused"
        }
    }

    #[async_trait]
    impl ImageGenerator for Unused {
        async fn generate(&self, _: &str) -> LogoResult<GeneratedImage> {
            Err(LogoError::Internal("unused".into()))
        }
        fn provider_name(&self) -> &'static str {
            "unused"
        }
    }

    #[async_trait]
    impl OrderStore for Unused {
        async fn insert(&self, _: NewOrder) -> LogoResult<Order> {
            Err(LogoError::Internal("unused".into()))
        }
        async fn list(&self) -> LogoResult<Vec<Order>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl Mailer for Unused {
        async fn send_logo(&self, _: &Order) -> LogoResult<()> {
            Ok(())
        }
    }

    fn router(cors_origins: Vec<String>) -> Router {
        let config = AppConfig {
            cors_origins,
            ..AppConfig::default()
        };
        let state = AppState::new(
            config,
            AdminAuth::new("secret", "pw").unwrap(),
            Arc::new(Unused),
            Arc::new(Unused),
            Arc::new(Unused),
            Arc::new(Unused),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(vec![])
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_any_origin_by_default() {
        let response = router(vec![])
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let app = router(vec!["https://shop.example".to_string()]);

        let allowed = app
            .clone()
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://shop.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://shop.example"
        );

        let denied = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
