//! # Order Fulfillment
//!
//! One linear attempt per request, no retries:
//!
//! 1. (optional) confirm the checkout session is paid
//! 2. generate the image; on failure stop here
//! 3. store the order
//! 4. email the logo; failures are logged and never surface to the caller

use crate::state::AppState;
use logo_core::{logo_prompt, CustomerDetails, LogoError, NewOrder, Order};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Which step of fulfillment failed.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// Payment proof missing, unpaid or unverifiable
    #[error("payment check failed: {0}")]
    Payment(LogoError),

    /// The image provider failed; nothing was stored
    #[error("image generation failed: {0}")]
    Generation(LogoError),

    /// The image was generated but the order could not be stored
    #[error("order storage failed: {0}")]
    Storage(LogoError),
}

/// Run the fulfillment workflow for a validated customer.
#[instrument(skip(state, customer, session_id), fields(name = %customer.name))]
pub async fn fulfill_order(
    state: &AppState,
    customer: CustomerDetails,
    session_id: Option<&str>,
) -> Result<Order, FulfillmentError> {
    if state.config.require_paid_checkout {
        verify_payment(state, &customer, session_id)
            .await
            .map_err(FulfillmentError::Payment)?;
    }

    let prompt = logo_prompt(&customer.name);
    let image = state.images.generate(&prompt).await.map_err(|e| {
        error!(
            provider = state.images.provider_name(),
            error = %e,
            "Image generation failed"
        );
        FulfillmentError::Generation(e)
    })?;

    debug!(
        prompt = image.effective_prompt(&prompt),
        revised = image.revised_prompt.is_some(),
        "Image generated"
    );

    let order = state
        .orders
        .insert(NewOrder::new(&customer, &image))
        .await
        .map_err(FulfillmentError::Storage)?;

    info!(order_id = order.id, "Order stored");

    if let Err(e) = state.mailer.send_logo(&order).await {
        error!(order_id = order.id, error = %e, "Failed to email logo");
    }

    Ok(order)
}

/// Confirm the checkout session belongs to this customer and is paid.
async fn verify_payment(
    state: &AppState,
    customer: &CustomerDetails,
    session_id: Option<&str>,
) -> Result<(), LogoError> {
    let session_id = session_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LogoError::InvalidRequest("session_id required".to_string()))?;

    let session = state.payments.retrieve_checkout(session_id).await?;

    if let Some(email) = session.metadata.get("email") {
        if !email.eq_ignore_ascii_case(&customer.email) {
            warn!(session_id, "Checkout session belongs to another customer");
            return Err(LogoError::InvalidRequest(
                "Checkout session does not match customer".to_string(),
            ));
        }
    }

    if !session.is_paid() {
        warn!(session_id, payment_status = ?session.payment_status, "Checkout not paid");
        return Err(LogoError::PaymentNotCompleted {
            session_id: session_id.to_string(),
        });
    }

    Ok(())
}
