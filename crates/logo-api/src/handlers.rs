//! # Request Handlers
//!
//! Axum request handlers for the logo shop API.

use crate::auth::AdminUser;
use crate::fulfillment::{fulfill_order, FulfillmentError};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use logo_core::{CustomerDetails, LogoCheckout, LogoError, Order};
use logo_stripe::{dispatch_webhook_event, LoggingWebhookHandler};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Admin login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Admin login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body shared by checkout and logo generation
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Checkout session id, only checked when paid checkout is required
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CustomerRequest {
    fn customer(&self) -> Result<CustomerDetails, LogoError> {
        CustomerDetails::parse(self.name.as_deref(), self.email.as_deref())
    }
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Hosted checkout page (redirect user here)
    pub url: String,
}

/// Generate logo response
#[derive(Debug, Serialize)]
pub struct GenerateLogoResponse {
    pub status: &'static str,
    pub image_url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, response: ErrorResponse) -> ApiError {
    (status, Json(response))
}

fn logo_error_to_response(err: LogoError) -> ApiError {
    let code = err.status_code();
    let message = match &err {
        LogoError::Database(_) | LogoError::Internal(_) | LogoError::Configuration(_) => {
            "Internal server error".to_string()
        }
        _ => err.to_string(),
    };
    error_response(
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        ErrorResponse::new(message, code),
    )
}

/// Upstream failures during checkout surface as 400 with the provider's message.
fn checkout_error_to_response(err: LogoError) -> ApiError {
    match &err {
        LogoError::ProviderError { .. } | LogoError::NetworkError(_) => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(err.provider_message(), 400),
        ),
        _ => logo_error_to_response(err),
    }
}

fn fulfillment_error_to_response(err: FulfillmentError) -> ApiError {
    match err {
        FulfillmentError::Payment(e) => checkout_error_to_response(e),
        FulfillmentError::Generation(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Error generating image", 500).with_details(e.provider_message()),
        ),
        FulfillmentError::Storage(e) => logo_error_to_response(e),
    }
}

/// A missing webhook secret is reported as 503 instead of a generic 500.
fn webhook_error_to_response(err: LogoError) -> ApiError {
    match &err {
        LogoError::Configuration(_) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("Webhook verification is not configured", 503),
        ),
        _ => logo_error_to_response(err),
    }
}

/// Any unreadable JSON body is treated as missing input.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected request body");
            Err(error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid JSON body", 400),
            ))
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "logo-shop",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Exchange the admin password for a token
#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = json_body(payload)?;

    let password = request.password.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Password required", 400),
        )
    })?;

    let token = state
        .auth
        .login(&password)
        .map_err(logo_error_to_response)?;

    info!("Admin logged in");
    Ok(Json(LoginResponse { token }))
}

/// List all orders, newest first
#[instrument(skip_all, fields(jti = %admin.claims.jti))]
pub async fn admin_orders(
    admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.orders.list().await.map_err(logo_error_to_response)?;
    info!(count = orders.len(), "Listed orders");
    Ok(Json(orders))
}

/// Create a hosted checkout session for one logo
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let request = json_body(payload)?;
    let customer = request.customer().map_err(logo_error_to_response)?;

    let success_url = state
        .urls
        .success_url(&customer)
        .map_err(logo_error_to_response)?;
    let cancel_url = state.urls.cancel_url();

    let checkout = LogoCheckout::for_customer(customer);
    let session = state
        .payments
        .create_checkout(&checkout, &success_url, &cancel_url)
        .await
        .map_err(|e| {
            error!(
                provider = state.payments.provider_name(),
                error = %e,
                "Checkout creation failed"
            );
            checkout_error_to_response(e)
        })?;

    let url = session.checkout_url.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Checkout session has no URL", 400),
        )
    })?;

    info!(session_id = %session.session_id, "Checkout session created");
    Ok(Json(CheckoutResponse { url }))
}

/// Generate a logo, store the order and email it to the customer
#[instrument(skip(state, payload))]
pub async fn generate_logo(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<GenerateLogoResponse>, ApiError> {
    let request = json_body(payload)?;
    let customer = request.customer().map_err(logo_error_to_response)?;

    let order = fulfill_order(&state, customer, request.session_id.as_deref())
        .await
        .map_err(fulfillment_error_to_response)?;

    Ok(Json(GenerateLogoResponse {
        status: "ok",
        image_url: order.image_url,
    }))
}

/// Stripe webhook receiver; verified events are logged only
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Missing Stripe-Signature header", 400),
            )
        })?;

    let event = state
        .payments
        .verify_webhook(&body, signature)
        .await
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            webhook_error_to_response(e)
        })?;

    info!(
        "Received webhook: type={:?}, id={}",
        event.event_type, event.event_id
    );

    if let Err(e) = dispatch_webhook_event(&LoggingWebhookHandler, &event) {
        error!("Webhook handler error: {}", e);
    }

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_details_skipped_when_absent() {
        let body = serde_json::to_value(ErrorResponse::new("Nope", 400)).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Nope", "code": 400}));

        let body =
            serde_json::to_value(ErrorResponse::new("Nope", 500).with_details("why")).unwrap();
        assert_eq!(body["details"], "why");
    }

    #[test]
    fn test_database_errors_are_sanitized() {
        let (status, Json(body)) =
            logo_error_to_response(LogoError::Database("no such table: orders".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.contains("orders"));
    }

    #[test]
    fn test_checkout_provider_error_is_bad_request() {
        let (status, Json(body)) =
            checkout_error_to_response(LogoError::provider("stripe", "Invalid API Key"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid API Key");
    }

    #[test]
    fn test_generation_error_carries_details() {
        let (status, Json(body)) = fulfillment_error_to_response(FulfillmentError::Generation(
            LogoError::provider("openai", "Rate limit exceeded"),
        ));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Error generating image");
        assert_eq!(body.details.as_deref(), Some("Rate limit exceeded"));
    }

    #[test]
    fn test_webhook_without_secret_is_unavailable() {
        let (status, Json(body)) = webhook_error_to_response(LogoError::Configuration(
            "STRIPE_WEBHOOK_SECRET not set".to_string(),
        ));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, 503);
        assert_eq!(body.error, "Webhook verification is not configured");
    }

    #[test]
    fn test_webhook_bad_signature_stays_unauthorized() {
        let (status, _) = webhook_error_to_response(LogoError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unpaid_is_payment_required() {
        let (status, _) = fulfillment_error_to_response(FulfillmentError::Payment(
            LogoError::PaymentNotCompleted {
                session_id: "cs_test_1".to_string(),
            },
        ));
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    }
}
