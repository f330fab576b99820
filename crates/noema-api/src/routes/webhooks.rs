use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use noema_core::webhook::{construct_event, WebhookEventKind};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::routes::unix_now;
use crate::state::AppState;

/// Stripe webhook receiver. The raw body must reach the signature check
/// unmodified, so it is taken as bytes.
pub async fn stripe(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let stripe = &state.config.stripe;
    let (Some(_), Some(secret)) = (&stripe.secret_key, &stripe.webhook_secret) else {
        return Err(ApiError::NotConfigured("Stripe webhook not configured".to_string()));
    };

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Webhook Error: missing Stripe-Signature header"))?;
    let event = construct_event(&body, signature, secret, unix_now())
        .map_err(|e| ApiError::bad_request(format!("Webhook Error: {}", e.message())))?;

    match event.kind() {
        WebhookEventKind::CheckoutSessionCompleted => {
            info!(event = %event.id, "checkout session completed")
        }
        WebhookEventKind::InvoicePaid => info!(event = %event.id, "invoice paid"),
        WebhookEventKind::SubscriptionDeleted => {
            info!(event = %event.id, "subscription deleted")
        }
        WebhookEventKind::Other => debug!(event = %event.id, kind = %event.event_type, "ignored"),
    }

    Ok(Json(json!({ "received": true })))
}
