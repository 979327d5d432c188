//! # Stripe Webhook Handling
//!
//! Signature verification and parsing for Stripe webhook deliveries.
//! Events are only logged: fulfillment happens through `/generate-logo`.

use chrono::{DateTime, Utc};
use logo_core::{constant_time_compare, LogoError, LogoResult, WebhookEvent, WebhookEventType};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Maximum age of a signed delivery, in seconds
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Events that should be enabled in the Stripe Dashboard
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &[
    "checkout.session.completed",
    "checkout.session.expired",
    "payment_intent.payment_failed",
];

// =============================================================================
// Signature Verification
// =============================================================================

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> LogoResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        LogoError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(LogoError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

pub(crate) fn compute_hmac_sha256(secret: &str, message: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a `Stripe-Signature` header against the raw payload.
///
/// `now` is the current Unix time; deliveries older or newer than
/// [`SIGNATURE_TOLERANCE_SECS`] are rejected.
pub fn verify_signature(secret: &str, payload: &[u8], header: &str, now: i64) -> LogoResult<()> {
    let sig_parts = parse_signature_header(header)?;

    if (now - sig_parts.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(LogoError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let mut signed_payload = format!("{}.", sig_parts.timestamp).into_bytes();
    signed_payload.extend_from_slice(payload);
    let expected_sig = compute_hmac_sha256(secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(LogoError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    Ok(())
}

// =============================================================================
// Event Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

/// Parse a verified webhook payload
pub fn parse_event(payload: &[u8]) -> LogoResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| LogoError::WebhookParseError(format!("Failed to parse webhook: {}", e)))?;

    debug!("Verified Stripe webhook: type={}", event.event_type);

    let event_type = match event.event_type.as_str() {
        "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
        "checkout.session.expired" => WebhookEventType::CheckoutExpired,
        "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
        other => WebhookEventType::Unknown(other.to_string()),
    };

    let object = &event.data.object;

    let session_id = object
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from);

    let customer_email = object
        .get("customer_details")
        .and_then(|cd| cd.get("email"))
        .and_then(|v| v.as_str())
        .or_else(|| object.get("customer_email").and_then(|v| v.as_str()))
        .map(String::from);

    let amount_paid = object.get("amount_total").and_then(|v| v.as_i64());

    let metadata: HashMap<String, String> = object
        .get("metadata")
        .and_then(|m| m.as_object())
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Ok(WebhookEvent {
        event_id: event.id,
        event_type,
        session_id,
        customer_email,
        amount_paid,
        metadata,
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

// =============================================================================
// Dispatch
// =============================================================================

/// Webhook event handler trait
///
/// Default methods log the event and succeed.
pub trait WebhookHandler: Send + Sync {
    /// Called when a checkout session is completed
    fn on_checkout_completed(&self, event: &WebhookEvent) -> LogoResult<()> {
        info!(
            session_id = ?event.session_id,
            customer = ?event.customer_email,
            amount = ?event.amount_paid,
            "Checkout completed"
        );
        Ok(())
    }

    /// Called when a checkout session expires unpaid
    fn on_checkout_expired(&self, event: &WebhookEvent) -> LogoResult<()> {
        info!(session_id = ?event.session_id, "Checkout expired");
        Ok(())
    }

    /// Called when a payment fails
    fn on_payment_failed(&self, event: &WebhookEvent) -> LogoResult<()> {
        warn!(event_id = %event.event_id, "Payment failed");
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> LogoResult<()> {
        debug!("Unhandled webhook event: {:?}", event.event_type);
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> LogoResult<()> {
    match &event.event_type {
        WebhookEventType::CheckoutCompleted => handler.on_checkout_completed(event),
        WebhookEventType::CheckoutExpired => handler.on_checkout_expired(event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}

/// Build a valid `Stripe-Signature` header for a payload (test helper).
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> String {
    let mut signed_payload = format!("{}.", timestamp).into_bytes();
    signed_payload.extend_from_slice(payload);
    format!(
        "t={},v1={}",
        timestamp,
        compute_hmac_sha256(secret, &signed_payload)
    )
}
