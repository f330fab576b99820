use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::routes::parse_body;
use crate::state::AppState;
use crate::stripe::CheckoutRequest;

#[derive(Debug, Deserialize)]
struct CheckoutBody {
    #[serde(default)]
    plan: Option<String>,
}

/// `{plan}` to a Stripe Checkout URL.
pub async fn create_session(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let Some(stripe) = &state.stripe else {
        return Err(ApiError::NotConfigured(
            "Stripe is not configured (STRIPE_SECRET_KEY missing)".to_string(),
        ));
    };
    let body: CheckoutBody = parse_body(&body)?;
    let plan = body.plan.unwrap_or_default();
    let price = state
        .config
        .core
        .prices
        .price_for(&plan)
        .ok_or_else(|| ApiError::bad_request("Invalid or missing plan"))?;

    let base = &state.config.public_base_url;
    let session = stripe
        .create_checkout_session(&CheckoutRequest {
            price,
            plan: &plan,
            success_url: format!("{base}/?checkout=success"),
            cancel_url: format!("{base}/pricing?checkout=cancel"),
        })
        .await?;
    info!(session = %session.id, %plan, "checkout session created");

    let url = session
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadGateway("checkout session has no url".to_string()))?;
    Ok(Json(json!({ "url": url })))
}
